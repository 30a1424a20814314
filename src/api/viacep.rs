use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::geocoder::GeocodeError;
use crate::config::ViaCepConfig;
use crate::domain::{Address, format_cep, normalize_cep};

/// ViaCEP lookup result. ViaCEP answers unknown CEPs with `{"erro": true}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CepAddress {
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub ddd: String,
}

impl CepAddress {
    /// Prefill an address form; number and description stay empty.
    pub fn to_address(&self) -> Address {
        Address {
            cep: format_cep(&self.cep),
            street: self.logradouro.clone(),
            complement: (!self.complemento.is_empty()).then(|| self.complemento.clone()),
            neighborhood: self.bairro.clone(),
            city: self.localidade.clone(),
            state: self.uf.clone(),
            ..Address::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViaCepResponse {
    Found(CepAddress),
    Missing {
        #[allow(dead_code)]
        erro: serde_json::Value,
    },
}

pub struct ViaCepClient {
    client: Client,
    url: String,
}

impl ViaCepClient {
    pub fn new(config: &ViaCepConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn fetch(&self, cep: &str) -> Result<CepAddress, GeocodeError> {
        let digits = normalize_cep(cep);
        if digits.len() != 8 {
            return Err(GeocodeError::Rejected(format!("CEP {cep:?} must have 8 digits")));
        }

        let response = self
            .client
            .get(format!("{}/{}/json/", self.url, digits))
            .send()?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        match response.json::<ViaCepResponse>()? {
            ViaCepResponse::Found(address) => Ok(address),
            ViaCepResponse::Missing { .. } => Err(GeocodeError::NotFound(digits)),
        }
    }

    /// Like [`fetch`](Self::fetch) but every failure is just "no address".
    pub fn lookup(&self, cep: &str) -> Option<CepAddress> {
        match self.fetch(cep) {
            Ok(address) => Some(address),
            Err(GeocodeError::NotFound(_)) => {
                debug!(cep, "CEP not found");
                None
            }
            Err(e) => {
                warn!(cep, error = %e, "CEP lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FOUND: &str = r#"{
        "cep": "79000-000",
        "logradouro": "Rua das Garças",
        "complemento": "",
        "bairro": "Tayamã Park",
        "localidade": "Campo Grande",
        "uf": "MS",
        "ibge": "5002704",
        "gia": "",
        "ddd": "67",
        "siafi": "9051"
    }"#;

    #[test]
    fn test_parse_found_and_missing() {
        match serde_json::from_str::<ViaCepResponse>(FOUND).unwrap() {
            ViaCepResponse::Found(a) => assert_eq!(a.localidade, "Campo Grande"),
            other => panic!("unexpected {other:?}"),
        }

        let missing: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(matches!(missing, ViaCepResponse::Missing { .. }));
    }

    #[test]
    fn test_to_address() {
        let cep: CepAddress = serde_json::from_str(FOUND).unwrap();
        let addr = cep.to_address();
        assert_eq!(addr.cep, "79000-000");
        assert_eq!(addr.street, "Rua das Garças");
        assert_eq!(addr.neighborhood, "Tayamã Park");
        assert_eq!(addr.state, "MS");
        assert_eq!(addr.complement, None);
        assert!(addr.number.is_empty());
    }

    #[test]
    fn test_short_cep_rejected_without_request() {
        let client = ViaCepClient::new(&ViaCepConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(client.fetch("7900"), Err(GeocodeError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_lookup_against_mock() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/79000000/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FOUND))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ws/99999999/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"erro": true})))
            .mount(&server)
            .await;

        let config = ViaCepConfig {
            url: format!("{}/ws/", server.uri()),
            timeout_secs: 5,
        };
        let (found, missing) = tokio::task::spawn_blocking(move || {
            let client = ViaCepClient::new(&config).unwrap();
            (client.lookup("79000-000"), client.lookup("99999-999"))
        })
        .await
        .unwrap();

        assert_eq!(found.map(|a| a.bairro), Some("Tayamã Park".to_string()));
        assert_eq!(missing, None);
    }
}
