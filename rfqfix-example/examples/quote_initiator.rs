//! FIX 4.2 quote client: requests a quote, lifts it and logs out.
use async_trait::async_trait;
use rfqfix::prelude::*;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
mod common;
use common::{ExampleConfig, init_logging};

const SYMBOL: &str = "EUR/USD";
const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
enum DeskEvent {
    LoggedOn,
    Status(String, QuoteStatus),
    Rejected(String, QuoteRequestRejectReason),
}

struct QuoteClient {
    router: MessageRouter,
    events: mpsc::UnboundedSender<DeskEvent>,
}

#[async_trait]
impl Application for QuoteClient {
    async fn on_create(&self, session_id: &SessionId) {
        info!(%session_id, "session created");
    }

    async fn on_logon(&self, session_id: &SessionId) {
        info!(%session_id, "logon");
        let _ = self.events.send(DeskEvent::LoggedOn);
    }

    async fn on_logout(&self, session_id: &SessionId) {
        info!(%session_id, "logout");
    }

    async fn from_admin(
        &self,
        _message: &Message,
        _session_id: &SessionId,
    ) -> std::result::Result<(), MessageRejectError> {
        Ok(())
    }

    async fn from_app(
        &self,
        message: &Message,
        session_id: &SessionId,
    ) -> std::result::Result<(), MessageRejectError> {
        self.router.route(message, session_id)
    }
}

fn client_router(events: mpsc::UnboundedSender<DeskEvent>) -> MessageRouter {
    let mut router = MessageRouter::new();

    let status_events = events.clone();
    router.add_route(quotestatusreport::route(
        move |report: QuoteStatusReport, _session_id| {
            let quote_req_id = report.get_quote_req_id()?;
            let status = report.get_quote_status()?;
            if report.has_bid_px() && report.has_offer_px() {
                info!(
                    %quote_req_id,
                    %status,
                    bid = %report.get_bid_px()?,
                    offer = %report.get_offer_px()?,
                    "quote"
                );
            }
            let _ = status_events.send(DeskEvent::Status(quote_req_id, status));
            Ok(())
        },
    ));

    router.add_route(quoterequestreject::route(
        move |reject: QuoteRequestReject, _session_id| {
            let quote_req_id = reject.get_quote_req_id()?;
            let reason = reject.get_quote_request_reject_reason()?;
            if reject.has_no_related_sym() {
                for entry in reject.get_no_related_sym()?.iter() {
                    warn!(%quote_req_id, symbol = %entry.get_symbol()?, "rejected symbol");
                }
            }
            let _ = events.send(DeskEvent::Rejected(quote_req_id, reason));
            Ok(())
        },
    ));

    router
}

async fn next_event(
    events: &mut mpsc::UnboundedReceiver<DeskEvent>,
) -> anyhow::Result<DeskEvent> {
    tokio::time::timeout(REPLY_TIMEOUT, events.recv())
        .await?
        .ok_or_else(|| anyhow::anyhow!("session ended"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::initiator();
    let session_id = cfg.session_id()?;

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let engine = EngineBuilder::new()
        .with_application(QuoteClient {
            router: client_router(events_tx.clone()),
            events: events_tx,
        })
        .add_session(cfg.session_config()?)
        .build()?;

    let addr = tokio::net::lookup_host(cfg.addr())
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("cannot resolve {}", cfg.addr()))?;
    info!("Connecting to {} as {}", addr, session_id);
    let (handle, task) = engine.connect(&session_id, addr).await?;

    match next_event(&mut events).await? {
        DeskEvent::LoggedOn => {}
        other => anyhow::bail!("expected logon, got {other:?}"),
    }

    handle.send(RfqRequest::new("RFQ-1").to_message()).await?;
    match next_event(&mut events).await? {
        DeskEvent::Status(quote_req_id, QuoteStatus::Active) => {
            info!(%quote_req_id, "quote active, lifting");
        }
        other => anyhow::bail!("unexpected reply to RFQ: {other:?}"),
    }

    let response = QuoteResponse::new("QRSP-1", QuoteRespType::HitLift, Side::Buy, SYMBOL);
    handle.send(response.to_message()).await?;
    match next_event(&mut events).await? {
        DeskEvent::Status(quote_req_id, status) => info!(%quote_req_id, %status, "trade"),
        DeskEvent::Rejected(quote_req_id, reason) => warn!(%quote_req_id, %reason, "rejected"),
        DeskEvent::LoggedOn => {}
    }

    handle.logout(Some("done".to_string())).await?;
    task.await??;
    info!("Session closed");
    Ok(())
}
