/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Network runtime for FIX sessions.
//!
//! An [`Engine`] owns the configured sessions and runs each live one as a
//! tokio task. The task feeds decoded frames, a one second timer and
//! [`SessionHandle`] commands into a [`FixSession`] and carries out the
//! [`SessionAction`]s it returns.

use crate::application::{Application, SessionId};
use crate::error::EngineError;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rfqfix_core::error::MessageRejectError;
use rfqfix_core::message::MsgType;
use rfqfix_dictionary::Dictionary;
use rfqfix_session::{FixSession, Role, SessionAction, SessionConfig};
use rfqfix_store::{MemoryStore, MessageStore};
use rfqfix_tagvalue::Message;
use rfqfix_transport::FixCodec;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

const COMMAND_BUFFER: usize = 256;
const TIMER_PERIOD: Duration = Duration::from_secs(1);

/// Connection settings shared by every session of an engine.
#[derive(Debug, Clone)]
pub(crate) struct EngineSettings {
    pub(crate) connect_timeout: Duration,
    pub(crate) reconnect_interval: Duration,
    pub(crate) max_reconnect_attempts: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 10,
        }
    }
}

/// Requests a [`SessionHandle`] passes to its session task.
#[derive(Debug)]
pub enum Command {
    /// Send an application or admin message.
    Send(Message),
    /// Start a logout with optional text.
    Logout(Option<String>),
}

/// Handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Returns the session identifier.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Queues `message` for sending.
    ///
    /// The session stamps the header fields; callers fill MsgType and body.
    ///
    /// # Errors
    /// `EngineError::SessionClosed` once the session task has ended.
    pub async fn send(&self, message: Message) -> Result<(), EngineError> {
        self.command(Command::Send(message)).await
    }

    /// Asks the session to log out.
    ///
    /// # Errors
    /// `EngineError::SessionClosed` once the session task has ended.
    pub async fn logout(&self, text: Option<String>) -> Result<(), EngineError> {
        self.command(Command::Logout(text)).await
    }

    async fn command(&self, command: Command) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EngineError::SessionClosed(self.session_id.to_string()))
    }
}

struct Shared<A> {
    application: Arc<A>,
    sessions: Vec<SessionConfig>,
    stores: HashMap<SessionId, Arc<dyn MessageStore>>,
    dictionary: Option<Dictionary>,
    settings: EngineSettings,
    running: Mutex<HashMap<SessionId, SessionHandle>>,
}

/// FIX engine running initiator and acceptor sessions over TCP.
pub struct Engine<A: Application> {
    shared: Arc<Shared<A>>,
}

impl<A: Application> Clone for Engine<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: Application + 'static> std::fmt::Debug for Engine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("sessions", &self.session_ids())
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl<A: Application + 'static> Engine<A> {
    pub(crate) fn new(
        application: Arc<A>,
        sessions: Vec<SessionConfig>,
        stores: HashMap<SessionId, Arc<dyn MessageStore>>,
        dictionary: Option<Dictionary>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                application,
                sessions,
                stores,
                dictionary,
                settings,
                running: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the IDs of all configured sessions.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.shared
            .sessions
            .iter()
            .map(SessionId::from_config)
            .collect()
    }

    /// Returns a handle to `session_id` if it is currently running.
    #[must_use]
    pub fn session(&self, session_id: &SessionId) -> Option<SessionHandle> {
        self.shared.running.lock().get(session_id).cloned()
    }

    /// Accepts connections on `listener` until it fails.
    ///
    /// Each connection must open with a Logon whose CompIDs match a
    /// configured session; other connections are dropped.
    ///
    /// # Errors
    /// Listener failures.
    pub async fn accept(&self, listener: TcpListener) -> Result<(), EngineError> {
        info!(addr = ?listener.local_addr().ok(), "accepting FIX connections");
        loop {
            let (stream, peer) = listener.accept().await?;
            let engine = self.clone();
            tokio::spawn(async move {
                if let Err(e) = engine.serve_inbound(stream, peer).await {
                    warn!(%peer, error = %e, "inbound session failed");
                }
            });
        }
    }

    /// Connects `session_id` to `addr` as initiator and starts its task.
    ///
    /// Connecting is retried every reconnect interval up to the configured
    /// number of attempts.
    ///
    /// # Errors
    /// `EngineError::Configuration` for an unknown or already running
    /// session, checked before dialing; connect failures once the attempts
    /// are exhausted.
    pub async fn connect(
        &self,
        session_id: &SessionId,
        addr: SocketAddr,
    ) -> Result<(SessionHandle, JoinHandle<Result<(), EngineError>>), EngineError> {
        let config = self
            .shared
            .sessions
            .iter()
            .find(|c| SessionId::from_config(c) == *session_id)
            .cloned()
            .ok_or_else(|| EngineError::Configuration(format!("unknown session {session_id}")))?;

        let (handle, commands) = self.register(session_id)?;
        let stream = match self.dial(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                self.shared.running.lock().remove(session_id);
                return Err(e);
            }
        };
        let framed = Framed::new(stream, codec_for(&config));
        let engine = self.clone();
        let task = tokio::spawn(async move {
            engine
                .run(config, Role::Initiator, framed, None, commands)
                .await
        });
        Ok((handle, task))
    }

    async fn dial(&self, addr: SocketAddr) -> Result<TcpStream, EngineError> {
        let settings = &self.shared.settings;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let last = attempt >= settings.max_reconnect_attempts;
            match tokio::time::timeout(settings.connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    stream.set_nodelay(true)?;
                    info!(%addr, attempt, "connected");
                    return Ok(stream);
                }
                Ok(Err(e)) if last => return Err(e.into()),
                Err(_) if last => return Err(EngineError::ConnectTimeout(settings.connect_timeout)),
                Ok(Err(e)) => warn!(%addr, attempt, error = %e, "connect failed"),
                Err(_) => warn!(%addr, attempt, "connect timed out"),
            }
            tokio::time::sleep(settings.reconnect_interval).await;
        }
    }

    async fn serve_inbound(&self, stream: TcpStream, peer: SocketAddr) -> Result<(), EngineError> {
        stream.set_nodelay(true)?;
        let mut framed = Framed::new(stream, FixCodec::new());

        let wait = self
            .shared
            .sessions
            .iter()
            .map(|c| c.logon_timeout)
            .max()
            .unwrap_or(Duration::from_secs(10));
        let first = match tokio::time::timeout(wait, framed.next()).await {
            Ok(Some(first)) => first?,
            Ok(None) => {
                debug!(%peer, "connection closed before logon");
                return Ok(());
            }
            Err(_) => {
                warn!(%peer, "no logon received");
                return Ok(());
            }
        };

        let inbound = SessionId::from_inbound(&first);
        let Some(config) = self
            .shared
            .sessions
            .iter()
            .find(|c| SessionId::from_config(c).same_comp_ids(&inbound))
            .cloned()
        else {
            warn!(%peer, session = %inbound, "no session configured");
            return Ok(());
        };
        let session_id = SessionId::from_config(&config);
        let (_, commands) = match self.register(&session_id) {
            Ok(registered) => registered,
            Err(e) => {
                warn!(%peer, error = %e, "refusing connection");
                return Ok(());
            }
        };
        *framed.codec_mut() = codec_for(&config);
        info!(%peer, session = %session_id, "inbound session");
        self.run(config, Role::Acceptor, framed, Some(first), commands)
            .await
    }

    fn register(
        &self,
        session_id: &SessionId,
    ) -> Result<(SessionHandle, mpsc::Receiver<Command>), EngineError> {
        let mut running = self.shared.running.lock();
        if running.contains_key(session_id) {
            return Err(EngineError::Configuration(format!(
                "session {session_id} is already running"
            )));
        }
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = SessionHandle {
            session_id: session_id.clone(),
            commands: tx,
        };
        running.insert(session_id.clone(), handle.clone());
        Ok((handle, rx))
    }

    async fn run<T>(
        &self,
        config: SessionConfig,
        role: Role,
        framed: Framed<T, FixCodec>,
        first: Option<Message>,
        commands: mpsc::Receiver<Command>,
    ) -> Result<(), EngineError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let session_id = SessionId::from_config(&config);
        let result = self
            .drive(config, role, framed, first, commands)
            .await;
        self.shared.running.lock().remove(&session_id);
        match &result {
            Ok(()) => info!(session = %session_id, "session ended"),
            Err(e) => error!(session = %session_id, error = %e, "session failed"),
        }
        result
    }

    async fn drive<T>(
        &self,
        config: SessionConfig,
        role: Role,
        mut framed: Framed<T, FixCodec>,
        first: Option<Message>,
        mut commands: mpsc::Receiver<Command>,
    ) -> Result<(), EngineError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let app = Arc::clone(&self.shared.application);
        let dictionary = self.shared.dictionary.as_ref();
        let session_id = SessionId::from_config(&config);
        let store = self
            .shared
            .stores
            .get(&session_id)
            .cloned()
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        let hook_app = Arc::clone(&app);
        let hook_id = session_id.clone();
        let mut session = FixSession::new(config, role, store).with_admin_hook(Box::new(
            move |message: &mut Message| hook_app.to_admin(message, &hook_id),
        ));

        app.on_create(&session_id).await;
        session.on_connect(Instant::now());

        let mut actions = Vec::new();
        if role == Role::Initiator {
            actions.extend(session.logon().await?);
        }
        if let Some(message) = first {
            let received =
                receive(&mut session, app.as_ref(), dictionary, &session_id, message).await?;
            actions.extend(received);
        }
        if !perform(&mut session, &mut framed, app.as_ref(), dictionary, &session_id, actions).await? {
            return Ok(());
        }

        let mut ticker = tokio::time::interval(TIMER_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            let actions = tokio::select! {
                inbound = framed.next() => match inbound {
                    Some(Ok(message)) => {
                        receive(&mut session, app.as_ref(), dictionary, &session_id, message).await?
                    }
                    Some(Err(e)) => {
                        warn!(session = %session_id, error = %e, "transport error");
                        let actions = session.on_disconnect(&e.to_string()).await?;
                        perform(&mut session, &mut framed, app.as_ref(), dictionary, &session_id, actions).await?;
                        return Err(e.into());
                    }
                    None => {
                        let actions = session.on_disconnect("connection closed by peer").await?;
                        perform(&mut session, &mut framed, app.as_ref(), dictionary, &session_id, actions).await?;
                        return Ok(());
                    }
                },
                _ = ticker.tick() => session.on_timer(Instant::now()).await?,
                command = commands.recv(), if commands_open => match command {
                    Some(Command::Send(mut message)) => {
                        if !message.is_admin() {
                            app.to_app(&mut message, &session_id);
                        }
                        match session.send(message).await {
                            Ok(bytes) => vec![SessionAction::Send(bytes)],
                            Err(e) => {
                                warn!(session = %session_id, error = %e, "message not sent");
                                Vec::new()
                            }
                        }
                    }
                    Some(Command::Logout(text)) => session.logout(text.as_deref()).await?,
                    None => {
                        commands_open = false;
                        Vec::new()
                    }
                },
            };
            if !perform(&mut session, &mut framed, app.as_ref(), dictionary, &session_id, actions).await? {
                return Ok(());
            }
        }
    }
}

fn codec_for(config: &SessionConfig) -> FixCodec {
    FixCodec::new()
        .with_max_message_size(config.max_message_size)
        .with_checksum_validation(config.validate_checksum)
}

/// Validates `message` against the dictionary, then hands it to the
/// application.
async fn screen<A>(
    app: &A,
    dictionary: Option<&Dictionary>,
    message: &Message,
    session_id: &SessionId,
) -> Result<(), MessageRejectError>
where
    A: Application + ?Sized,
{
    if let Some(dictionary) = dictionary {
        dictionary.validate(message)?;
    }
    if message.is_admin() {
        app.from_admin(message, session_id).await
    } else {
        app.from_app(message, session_id).await
    }
}

/// Feeds one inbound message to the session.
///
/// A Logon that completes the handshake is screened first; a refusal
/// answers with Logout instead of logging on.
async fn receive<A>(
    session: &mut FixSession,
    app: &A,
    dictionary: Option<&Dictionary>,
    session_id: &SessionId,
    message: Message,
) -> Result<Vec<SessionAction>, EngineError>
where
    A: Application + ?Sized,
{
    let is_logon = message.msg_type().is_ok_and(|t| t == MsgType::Logon);
    if is_logon && session.is_awaiting_logon() {
        if let Err(reject) = screen(app, dictionary, &message, session_id).await {
            warn!(session = %session_id, %reject, "logon refused");
            return Ok(session.refuse_logon(&reject).await?);
        }
    }
    Ok(session.on_message(message).await?)
}

/// Carries out `actions`; returns false once the session must close.
async fn perform<A, T>(
    session: &mut FixSession,
    framed: &mut Framed<T, FixCodec>,
    app: &A,
    dictionary: Option<&Dictionary>,
    session_id: &SessionId,
    actions: Vec<SessionAction>,
) -> Result<bool, EngineError>
where
    A: Application + ?Sized,
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut pending: VecDeque<SessionAction> = actions.into();
    while let Some(action) = pending.pop_front() {
        match action {
            SessionAction::Send(bytes) => framed.send(bytes).await?,
            SessionAction::Deliver(message) => {
                if let Err(reject) = screen(app, dictionary, &message, session_id).await {
                    debug!(session = %session_id, %reject, "message rejected");
                    let bytes = session.reject(&message, &reject).await?;
                    framed.send(bytes).await?;
                }
            }
            SessionAction::LoggedOn => app.on_logon(session_id).await,
            SessionAction::LoggedOut => app.on_logout(session_id).await,
            SessionAction::Disconnect(reason) => {
                info!(session = %session_id, %reason, "disconnecting");
                if let Err(e) = SinkExt::<Bytes>::close(framed).await {
                    debug!(session = %session_id, error = %e, "close failed");
                }
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EngineBuilder;
    use async_trait::async_trait;
    use rfqfix_core::types::{CompId, Timestamp};
    use rfqfix_dictionary::{MessageCategory, MessageDef, Version};

    struct Recorder {
        events: mpsc::UnboundedSender<String>,
        refuse_logon: bool,
    }

    impl Recorder {
        fn new(events: mpsc::UnboundedSender<String>) -> Self {
            Self {
                events,
                refuse_logon: false,
            }
        }
    }

    #[async_trait]
    impl Application for Recorder {
        async fn on_create(&self, _session_id: &SessionId) {}

        async fn on_logon(&self, _session_id: &SessionId) {
            let _ = self.events.send("logon".to_string());
        }

        async fn on_logout(&self, _session_id: &SessionId) {
            let _ = self.events.send("logout".to_string());
        }

        async fn from_admin(
            &self,
            message: &Message,
            _session_id: &SessionId,
        ) -> Result<(), MessageRejectError> {
            if self.refuse_logon && message.header.get_str(35) == Some("A") {
                return Err(MessageRejectError::other("logon not permitted"));
            }
            Ok(())
        }

        async fn from_app(
            &self,
            message: &Message,
            _session_id: &SessionId,
        ) -> Result<(), MessageRejectError> {
            let msg_type = message.header.get_str(35).unwrap_or_default().to_string();
            let _ = self.events.send(format!("app:{msg_type}"));
            if msg_type == "R" {
                return Err(MessageRejectError::unsupported_message_type());
            }
            Ok(())
        }
    }

    fn config(sender: &str, target: &str) -> SessionConfig {
        SessionConfig::new(
            CompId::new(sender).unwrap(),
            CompId::new(target).unwrap(),
            "FIX.4.2",
        )
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event timed out")
            .expect("event channel closed")
    }

    fn rfq_dictionary() -> Dictionary {
        let mut dict = Dictionary::new(Version::Fix42);
        for tag in [8, 9, 35, 49, 56, 34, 52] {
            dict.add_header_field(tag, true);
        }
        dict.add_trailer_field(10, true);
        dict.add_message(
            MessageDef::new("A", "Logon", MessageCategory::Admin)
                .with_field(98, "EncryptMethod", true)
                .with_field(108, "HeartBtInt", true),
        );
        dict.add_message(
            MessageDef::new("AH", "RFQRequest", MessageCategory::App)
                .with_field(644, "RFQReqID", true),
        );
        dict
    }

    async fn spawn_acceptor(builder: EngineBuilder<Recorder>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let engine = builder.add_session(config("BANK", "CLIENT")).build().unwrap();
        tokio::spawn(async move { engine.accept(listener).await });
        addr
    }

    fn from_client(msg_type: &str, seq: u64) -> Message {
        let mut message = Message::with_type("FIX.4.2", msg_type);
        message.header.set_str(49, "CLIENT");
        message.header.set_str(56, "BANK");
        message.header.set_str(34, &seq.to_string());
        message
            .header
            .set_str(52, Timestamp::now().format_millis().as_str());
        message
    }

    async fn client_logon(addr: SocketAddr) -> Framed<TcpStream, FixCodec> {
        let stream = TcpStream::connect(addr).await.unwrap();
        let mut client = Framed::new(stream, FixCodec::new());
        let mut logon = from_client("A", 1);
        logon.body.set_str(98, "0");
        logon.body.set_str(108, "30");
        client.send(logon.build().unwrap()).await.unwrap();
        client
    }

    async fn next_message(client: &mut Framed<TcpStream, FixCodec>) -> Option<Message> {
        tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("read timed out")
            .map(|frame| frame.unwrap())
    }

    #[tokio::test]
    async fn test_engine_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (acceptor_tx, mut acceptor_rx) = mpsc::unbounded_channel();
        let acceptor = EngineBuilder::new()
            .with_application(Recorder::new(acceptor_tx))
            .add_session(config("BANK", "CLIENT"))
            .build()
            .unwrap();
        let server = acceptor.clone();
        tokio::spawn(async move { server.accept(listener).await });

        let (initiator_tx, mut initiator_rx) = mpsc::unbounded_channel();
        let initiator = EngineBuilder::new()
            .with_application(Recorder::new(initiator_tx))
            .add_session(config("CLIENT", "BANK"))
            .build()
            .unwrap();
        let client_id = SessionId::new("FIX.4.2", "CLIENT", "BANK");
        let (handle, task) = initiator.connect(&client_id, addr).await.unwrap();

        assert_eq!(next_event(&mut acceptor_rx).await, "logon");
        assert_eq!(next_event(&mut initiator_rx).await, "logon");
        assert!(initiator.session(&client_id).is_some());
        assert!(
            acceptor
                .session(&SessionId::new("FIX.4.2", "BANK", "CLIENT"))
                .is_some()
        );

        let mut rfq = Message::with_type("FIX.4.2", "AH");
        rfq.body.set_str(644, "RFQ-1");
        handle.send(rfq).await.unwrap();
        assert_eq!(next_event(&mut acceptor_rx).await, "app:AH");

        let mut quote_request = Message::with_type("FIX.4.2", "R");
        quote_request.body.set_str(131, "QR-1");
        handle.send(quote_request).await.unwrap();
        assert_eq!(next_event(&mut acceptor_rx).await, "app:R");
        assert_eq!(next_event(&mut initiator_rx).await, "app:j");

        handle.logout(None).await.unwrap();
        assert_eq!(next_event(&mut initiator_rx).await, "logout");
        assert_eq!(next_event(&mut acceptor_rx).await, "logout");

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert!(initiator.session(&client_id).is_none());
        assert!(matches!(
            handle.send(Message::with_type("FIX.4.2", "AH")).await,
            Err(EngineError::SessionClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_engine_refuses_logon_the_application_rejects() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let addr = spawn_acceptor(EngineBuilder::new().with_application(Recorder {
            events: tx,
            refuse_logon: true,
        }))
        .await;

        let mut client = client_logon(addr).await;
        let logout = next_message(&mut client).await.unwrap();
        assert_eq!(logout.header.get_str(35), Some("5"));
        assert_eq!(logout.body.get_str(58), Some("logon not permitted"));
        assert!(next_message(&mut client).await.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_engine_rejects_messages_failing_dictionary() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let addr = spawn_acceptor(
            EngineBuilder::new()
                .with_application(Recorder::new(tx))
                .with_dictionary(rfq_dictionary()),
        )
        .await;

        let mut client = client_logon(addr).await;
        let reply = next_message(&mut client).await.unwrap();
        assert_eq!(reply.header.get_str(35), Some("A"));
        assert_eq!(next_event(&mut rx).await, "logon");

        client
            .send(from_client("AH", 2).build().unwrap())
            .await
            .unwrap();
        let reject = next_message(&mut client).await.unwrap();
        assert_eq!(reject.header.get_str(35), Some("3"));
        assert_eq!(reject.body.get_str(45), Some("2"));
        assert_eq!(reject.body.get_str(371), Some("644"));
        assert_eq!(reject.body.get_str(373), Some("1"));
        assert!(rx.try_recv().is_err());

        let mut rfq = from_client("AH", 3);
        rfq.body.set_str(644, "RFQ-1");
        client.send(rfq.build().unwrap()).await.unwrap();
        assert_eq!(next_event(&mut rx).await, "app:AH");
    }

    #[tokio::test]
    async fn test_engine_connect_refuses_running_session_before_dialing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let engine = EngineBuilder::new()
            .add_session(config("CLIENT", "BANK"))
            .with_reconnect_interval(Duration::from_millis(10))
            .with_max_reconnect_attempts(1)
            .build()
            .unwrap();
        let client_id = SessionId::new("FIX.4.2", "CLIENT", "BANK");
        let _running = engine.connect(&client_id, addr).await.unwrap();

        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let unreachable = closed.local_addr().unwrap();
        drop(closed);
        let err = engine.connect(&client_id, unreachable).await.unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
        drop(listener);
    }

    #[tokio::test]
    async fn test_engine_connect_unknown_session() {
        let engine = EngineBuilder::new()
            .add_session(config("CLIENT", "BANK"))
            .build()
            .unwrap();
        let addr: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let err = engine
            .connect(&SessionId::new("FIX.4.2", "OTHER", "BANK"), addr)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_engine_connect_gives_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let engine = EngineBuilder::new()
            .add_session(config("CLIENT", "BANK"))
            .with_reconnect_interval(Duration::from_millis(10))
            .with_max_reconnect_attempts(2)
            .build()
            .unwrap();
        let client_id = SessionId::new("FIX.4.2", "CLIENT", "BANK");
        let result = engine.connect(&client_id, addr).await;
        assert!(result.is_err());
        assert!(engine.session(&client_id).is_none());

        let retry = engine.connect(&client_id, addr).await.unwrap_err();
        assert!(!matches!(retry, EngineError::Configuration(_)));
    }
}
