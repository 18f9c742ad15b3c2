//! FIX 4.2 quote desk: answers RFQs with a quote and confirms responses.
use async_trait::async_trait;
use rfqfix::fix42::quoterequestreject::NoRelatedSymRepeatingGroup;
use rfqfix::prelude::*;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod common;
use common::{ExampleConfig, init_logging};

const SYMBOL: &str = "EUR/USD";
const QUOTE_VALIDITY_MS: u64 = 30_000;
const QUOTE_EXPIRY_MS: u64 = 60_000;

type Outbound = mpsc::UnboundedSender<(SessionId, Message)>;

struct QuoteDesk {
    router: MessageRouter,
}

#[async_trait]
impl Application for QuoteDesk {
    async fn on_create(&self, session_id: &SessionId) {
        info!(%session_id, "session created");
    }

    async fn on_logon(&self, session_id: &SessionId) {
        info!(%session_id, "logon");
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

fn status_report(quote_req_id: &str, status: QuoteStatus) -> QuoteStatusReport {
    let now = Timestamp::now().as_millis();
    let mut report = QuoteStatusReport::new(
        quote_req_id,
        SYMBOL,
        Decimal::new(1_000_000, 0),
        0,
        Timestamp::from_millis(now + QUOTE_VALIDITY_MS),
        Timestamp::from_millis(now + QUOTE_EXPIRY_MS),
        status,
    );
    report.set_quote_id(format!("Q-{quote_req_id}"));
    report.set_bid_px(Decimal::new(108_412, 5), 5);
    report.set_offer_px(Decimal::new(108_418, 5), 5);
    report
}

fn forward(
    outbound: &Outbound,
    session_id: &SessionId,
    message: Message,
) -> std::result::Result<(), MessageRejectError> {
    outbound
        .send((session_id.clone(), message))
        .map_err(|_| MessageRejectError::other("quote desk unavailable"))
}

fn desk_router(outbound: Outbound) -> MessageRouter {
    let mut router = MessageRouter::new();

    let rfq_outbound = outbound.clone();
    router.add_route(rfqrequest::route(move |rfq: RfqRequest, session_id| {
        let rfq_id = rfq.get_rfq_req_id()?;
        info!(%session_id, %rfq_id, "RFQ received");
        let report = status_report(&rfq_id, QuoteStatus::Active);
        forward(&rfq_outbound, session_id, report.to_message())
    }));

    router.add_route(quoteresponse::route(move |response: QuoteResponse, session_id| {
        let resp_id = response.get_quote_resp_id()?;
        let symbol = response.get_symbol()?;
        let resp_type = response.get_quote_resp_type()?;
        info!(%session_id, %resp_id, %symbol, %resp_type, "quote response received");

        if symbol != SYMBOL {
            let mut reject =
                QuoteRequestReject::new(&resp_id, QuoteRequestRejectReason::UnknownSymbol);
            let mut related = NoRelatedSymRepeatingGroup::new();
            related.add().set_symbol(&symbol);
            reject.set_no_related_sym(&related);
            return forward(&outbound, session_id, reject.to_message());
        }

        let status = match resp_type {
            QuoteRespType::HitLift => QuoteStatus::Accepted,
            QuoteRespType::Pass => QuoteStatus::Pass,
            _ => QuoteStatus::Pending,
        };
        let report = status_report(&resp_id, status);
        forward(&outbound, session_id, report.to_message())
    }));

    router
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::acceptor();

    let (outbound, mut replies) = mpsc::unbounded_channel();
    let engine = EngineBuilder::new()
        .with_application(QuoteDesk {
            router: desk_router(outbound),
        })
        .add_session(cfg.session_config()?)
        .with_dictionary(rfqfix::fix42::dictionary::dictionary())
        .build()?;

    let pump = engine.clone();
    tokio::spawn(async move {
        while let Some((session_id, message)) = replies.recv().await {
            match pump.session(&session_id) {
                Some(handle) => {
                    if let Err(e) = handle.send(message).await {
                        warn!(%session_id, error = %e, "reply dropped");
                    }
                }
                None => warn!(%session_id, "reply for a session that is not running"),
            }
        }
    });

    info!("Starting {} quote desk on {}", common::FIX_VERSION, cfg.addr());
    let listener = TcpListener::bind(cfg.addr()).await?;
    if let Err(e) = engine.accept(listener).await {
        error!("Error: {}", e);
        return Err(e.into());
    }
    Ok(())
}
