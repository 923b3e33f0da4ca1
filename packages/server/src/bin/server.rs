//! Multiplayer code editor room coordinator.
//!
//! Coordinates rooms with a shared code buffer, chat, typing lock, and
//! remote code execution over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin terakoya-server
//! cargo run --bin terakoya-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use terakoya_server::{
    infrastructure::{
        InMemoryQuotaLedger, PistonExecutionClient, SessionRegistry, StaticPlanSource,
        WebSocketMessagePusher,
        execution::piston::{DEFAULT_EXECUTION_TIMEOUT, DEFAULT_EXECUTION_URL},
    },
    ui::{Server, state::AppState},
    usecase::{
        ChangeLanguageUseCase, ChatUseCase, EditCodeUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RunCodeUseCase, ToggleTypingLockUseCase,
    },
};
use terakoya_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "terakoya-server")]
#[command(about = "Multiplayer code editor room coordinator", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Base URL of the Piston-compatible execution service
    #[arg(long, default_value = DEFAULT_EXECUTION_URL)]
    execution_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock / SessionRegistry / MessagePusher
    // 2. QuotaLedger / PlanSource / ExecutionClient
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Shared runtime collaborators
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(SessionRegistry::default());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Gate and outbound adapters
    let quota = Arc::new(InMemoryQuotaLedger::new(
        InMemoryQuotaLedger::DEFAULT_DAILY_CAP,
        clock.clone(),
    ));
    let plans = Arc::new(StaticPlanSource::default());
    let execution = Arc::new(PistonExecutionClient::new(
        args.execution_url.clone(),
        DEFAULT_EXECUTION_TIMEOUT,
    ));

    // 3. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        quota.clone(),
        plans.clone(),
        clock.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let edit_code_usecase = Arc::new(EditCodeUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let change_language_usecase = Arc::new(ChangeLanguageUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let toggle_typing_lock_usecase = Arc::new(ToggleTypingLockUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let chat_usecase = Arc::new(ChatUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let run_code_usecase = Arc::new(RunCodeUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        execution,
    ));

    // 4. Assemble shared state
    let app_state = Arc::new(AppState {
        join_room_usecase,
        leave_room_usecase,
        edit_code_usecase,
        change_language_usecase,
        toggle_typing_lock_usecase,
        chat_usecase,
        run_code_usecase,
        message_pusher,
        registry,
    });

    // 5. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
