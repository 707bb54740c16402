/// End-to-end tests: service, flow and commands against a mock backend and
/// an in-memory wallet provider.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tipstack_core::commands::Command;
use tipstack_core::provider::{ContractCallRequest, ProviderResponse, WalletProvider};
use tipstack_core::{SessionStore, TipConfig, TipService, TransactionOutcome};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SENDER: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
const RECIPIENT: &str = "ST123456789012345678901234567890123456";

struct RecordingWallet {
    response: ProviderResponse,
    requests: Mutex<Vec<ContractCallRequest>>,
}

impl RecordingWallet {
    fn new(response: ProviderResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl WalletProvider for RecordingWallet {
    async fn contract_call(&self, request: ContractCallRequest) -> anyhow::Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/exists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"exists": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/wallet/{RECIPIENT}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "email": "creator@example.com", "wallet": RECIPIENT }
        })))
        .mount(&server)
        .await;
    server
}

async fn service(server: &MockServer, wallet: Arc<RecordingWallet>) -> TipService {
    let mut config = TipConfig::default().with_backend_url(&server.uri()).unwrap();
    config.lookup_debounce_ms = 10;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.keep().join("session.json")).unwrap();
    TipService::bootstrap(config, wallet, Some(SENDER), store)
        .await
        .unwrap()
}

#[tokio::test]
async fn valid_tip_is_submitted_and_form_resets() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/users/send-tip"))
        .and(body_json(serde_json::json!({
            "recipientAddress": RECIPIENT,
            "amount": "10.5",
            "transactionId": "0xabc",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let wallet = RecordingWallet::new(ProviderResponse::Finished {
        tx_id: "0xabc".into(),
    });
    let svc = service(&server, wallet.clone()).await;
    let mut flow = svc.new_flow();

    flow.set_recipient(RECIPIENT);
    flow.set_amount("10.5");
    flow.settle_lookup().await;
    assert!(flow.form().lookup.as_ref().unwrap().found);
    assert!(flow.can_request_confirmation());

    flow.request_confirmation().unwrap();
    let outcome = flow.confirm().await.unwrap();
    assert_eq!(
        outcome,
        TransactionOutcome::Success {
            transaction_id: "0xabc".into()
        }
    );
    assert!(flow.form().recipient.is_empty());
    assert!(flow.form().amount.is_empty());

    let requests = wallet.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let payload = requests[0].to_wallet_payload();
    assert_eq!(payload["contractAddress"], "STNHKEPYEPJ8ET55ZZ0M5A34J0R3N5FM2CMMMAZ6");
    assert_eq!(payload["functionName"], "tip");
    assert_eq!(
        payload["functionArgs"][1],
        "0x0100000000000000000000000000a037a0"
    );
}

#[tokio::test]
async fn invalid_address_never_reaches_wallet() {
    let server = backend().await;
    let wallet = RecordingWallet::new(ProviderResponse::Finished {
        tx_id: "0xabc".into(),
    });
    let svc = service(&server, wallet.clone()).await;
    let mut flow = svc.new_flow();

    for amount in ["1", "10.5", "0.000001"] {
        flow.set_recipient("invalidaddr");
        flow.set_amount(amount);
        flow.settle_lookup().await;
        assert!(!flow.can_request_confirmation());
        assert!(flow.request_confirmation().is_err());
    }
    assert!(wallet.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn tip_command_cancelled_in_wallet_keeps_form() {
    let server = backend().await;
    let wallet = RecordingWallet::new(ProviderResponse::Cancelled);
    let mut svc = service(&server, wallet).await;
    let mut flow = svc.new_flow();

    let cmd = Command::parse(&format!("tip {RECIPIENT} 3")).unwrap();
    let prompt = cmd.confirmation_prompt(&mut flow).await.unwrap().unwrap();
    assert!(prompt.contains("3.000000 STX"));
    assert!(prompt.contains("creator@example.com"));

    let output = cmd.execute(&mut svc, &mut flow, false).await.unwrap();
    assert!(output.contains("Transaction cancelled"));
    assert_eq!(flow.form().recipient, RECIPIENT);
    assert_eq!(flow.form().amount, "3");
    assert_eq!(
        flow.form().validation_error.as_deref(),
        Some("Transaction cancelled")
    );
}

#[tokio::test]
async fn one_shot_tip_reports_json() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/users/send-tip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let wallet = RecordingWallet::new(ProviderResponse::Finished {
        tx_id: "0xdef".into(),
    });
    let mut svc = service(&server, wallet).await;
    let mut flow = svc.new_flow();

    let cmd = Command::parse(&format!("tip {RECIPIENT} 1.25")).unwrap();
    let output = cmd.execute(&mut svc, &mut flow, true).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["transaction_id"], "0xdef");
    assert_eq!(value["amount_micro_stx"], 1_250_000);
    assert_eq!(value["recipient"], RECIPIENT);
}

#[tokio::test]
async fn registry_outage_does_not_block_tipping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let wallet = RecordingWallet::new(ProviderResponse::Finished {
        tx_id: "0x1".into(),
    });
    let svc = service(&server, wallet.clone()).await;
    assert!(!svc.needs_registration());
    let mut flow = svc.new_flow();

    flow.set_recipient(RECIPIENT);
    flow.set_amount("1");
    flow.settle_lookup().await;
    assert_eq!(
        flow.form().validation_error.as_deref(),
        Some("Unverified wallet address")
    );

    flow.request_confirmation().unwrap();
    let outcome = flow.confirm().await.unwrap();
    assert!(matches!(outcome, TransactionOutcome::Success { .. }));
    assert_eq!(wallet.requests.lock().unwrap().len(), 1);
}
