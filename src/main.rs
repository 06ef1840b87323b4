// ============================================================================
// PayDash - terminal dashboard for the payments backend
// ============================================================================
// TUI binary. The event loop is synchronous (render, input, update); all
// network work runs on background threads with their own tokio runtimes,
// talking back through mpsc channels.
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use paydash::api::backend::{BackendClient, DepositAddress, MailRequest, StatusLabel};
use paydash::api::market::fetch_market_data;
use paydash::app::{App, NotificationKind, Screen, TransferField};
use paydash::config::{self, Config};
use paydash::models::{
    run_pipeline, MarketCoin, PriceTable, TransferRequest, TransferStage, TransferTimings,
    UserProfile,
};
use paydash::ui::{events::EventHandler, render};

// ============================================================================
// Worker protocol
// ============================================================================

/// Commands sent from the event loop to the background worker.
#[derive(Debug, Clone)]
enum AppCommand {
    /// Refetch the profile (balances, transactions).
    RefreshProfile,

    /// Run the five-stage transfer pipeline for a validated request.
    SubmitTransfer { request: TransferRequest },

    /// Relay a support message to the operators.
    SendSupportMessage { message: String },
}

/// Results flowing back from the worker and the market poller.
#[derive(Debug)]
enum AppResult {
    ProfileLoaded(Box<UserProfile>),
    ProfileError(String),

    /// A fresh market snapshot (replaces the previous table wholesale).
    MarketDataLoaded(Vec<MarketCoin>),

    /// The pipeline reached a stage.
    TransferStageReached(TransferStage),
    /// The mail call failed; the pipeline halted at Processing.
    TransferFailed(String),
    /// The post-completion delay elapsed; clear the form.
    TransferReset,

    SupportSent,
    SupportFailed(String),
}

// ============================================================================
// Logging
// ============================================================================

/// File logging with daily rotation. println! is unusable once the TUI owns
/// the terminal, so everything goes through tracing.
///
/// Control the level with RUST_LOG, e.g. `RUST_LOG=paydash=trace`.
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config::log_dir();
    std::fs::create_dir_all(&log_dir).context("Failed to create the log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "paydash.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paydash=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {}", e);
    });

    info!("PayDash starting up");
    let config = Config::from_env();

    let runtime = tokio::runtime::Runtime::new()?;

    let mut client = BackendClient::new(&config.api_base, config.token.clone())?;
    if !client.has_token() {
        login_from_env(&runtime, &mut client)?;
    }

    println!("Loading account data...");
    let (profile, addresses, labels) = runtime.block_on(load_initial_data(&client))?;
    info!(account_id = profile.account_id, "Account data loaded");
    println!("Account #{} loaded", profile.account_id);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new()));
    {
        let mut app_lock = app.lock().unwrap();
        app_lock.set_profile(profile);
        app_lock.deposit_addresses = addresses;
        app_lock.status_labels = labels;
    }

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx.clone(), client, app.clone());

    info!(poll_secs = config.poll_interval.as_secs(), "Spawning market poller");
    spawn_market_poller(result_tx, config.market_url.clone(), config.poll_interval);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Logs in with PAYDASH_EMAIL / PAYDASH_PASSWORD when no token is available,
/// persisting the fresh token for the next session.
fn login_from_env(runtime: &tokio::runtime::Runtime, client: &mut BackendClient) -> Result<()> {
    let email = std::env::var("PAYDASH_EMAIL").ok().filter(|v| !v.is_empty());
    let password = std::env::var("PAYDASH_PASSWORD").ok().filter(|v| !v.is_empty());

    match (email, password) {
        (Some(email), Some(password)) => {
            println!("Logging in as {}...", email);
            let token = runtime.block_on(client.login(&email, &password))?;
            if let Err(e) = config::save_token("token", &token) {
                warn!(error = ?e, "Could not persist the session token");
            }
            Ok(())
        }
        _ => anyhow::bail!(
            "No session: set PAYDASH_TOKEN, or PAYDASH_EMAIL and PAYDASH_PASSWORD to log in"
        ),
    }
}

/// Initial blocking load before the TUI takes over. The profile is required;
/// deposit addresses and status labels are best effort.
async fn load_initial_data(
    client: &BackendClient,
) -> Result<(UserProfile, Vec<DepositAddress>, Vec<StatusLabel>)> {
    let profile = client.fetch_me().await.context("Could not load your profile")?;

    let addresses = match client.fetch_deposit_addresses().await {
        Ok(addresses) => addresses,
        Err(e) => {
            warn!(error = ?e, "Deposit addresses unavailable");
            Vec::new()
        }
    };

    let labels = match client.fetch_status_labels().await {
        Ok(labels) => labels,
        Err(e) => {
            warn!(error = ?e, "Status labels unavailable");
            Vec::new()
        }
    };

    Ok((profile, addresses, labels))
}

// ============================================================================
// Background worker
// ============================================================================

/// Worker thread with its own tokio runtime. Quick commands run with
/// block_on; the transfer pipeline is spawned as a task so its multi-second
/// timers never block profile refreshes or support messages.
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    client: BackendClient,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create the worker runtime");
                return;
            }
        };

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::RefreshProfile => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some("Refreshing profile...".to_string()));
                            }

                            match runtime.block_on(client.fetch_me()) {
                                Ok(profile) => {
                                    let _ = result_tx.send(AppResult::ProfileLoaded(Box::new(profile)));
                                }
                                Err(e) => {
                                    error!(error = ?e, "Profile refresh failed");
                                    let _ = result_tx.send(AppResult::ProfileError(e.to_string()));
                                }
                            }

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }

                        AppCommand::SubmitTransfer { request } => {
                            let mail = mail_for(&app, request.mail_body(), request.mail_subject());
                            let client = client.clone();
                            let result_tx = result_tx.clone();

                            // Spawned, not block_on: the pipeline sleeps for
                            // several seconds and the worker must stay free.
                            runtime.spawn(async move {
                                let timings = TransferTimings::default();
                                let stage_tx = result_tx.clone();

                                let outcome = run_pipeline(
                                    timings,
                                    |stage| {
                                        let _ = stage_tx
                                            .send(AppResult::TransferStageReached(stage));
                                    },
                                    || async { client.send_mail(&mail).await },
                                )
                                .await;

                                match outcome {
                                    Ok(()) => {
                                        tokio::time::sleep(timings.reset).await;
                                        let _ = result_tx.send(AppResult::TransferReset);
                                    }
                                    Err(e) => {
                                        error!(error = ?e, "Transfer pipeline halted");
                                        let _ = result_tx
                                            .send(AppResult::TransferFailed(e.to_string()));
                                    }
                                }
                            });
                        }

                        AppCommand::SendSupportMessage { message } => {
                            let mail =
                                mail_for(&app, message, "Support Center Message".to_string());

                            match runtime.block_on(client.send_mail(&mail)) {
                                Ok(()) => {
                                    let _ = result_tx.send(AppResult::SupportSent);
                                }
                                Err(e) => {
                                    error!(error = ?e, "Support message failed");
                                    let _ = result_tx.send(AppResult::SupportFailed(e.to_string()));
                                }
                            }
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

/// Builds a mail-relay payload stamped with the current user's identity.
fn mail_for(app: &Arc<Mutex<App>>, message: String, subject: String) -> MailRequest {
    let (email, user_id) = {
        let app_lock = app.lock().unwrap();
        app_lock
            .profile
            .as_ref()
            .map(|p| (p.email.clone(), p.account_id.to_string()))
            .unwrap_or_default()
    };

    MailRequest {
        email,
        message,
        user_id,
        subject,
    }
}

/// Dedicated poll thread for market data. Polls are strictly sequential: the
/// next one starts only after the previous finished and the interval slept,
/// so requests never overlap. Failures keep the last table in place.
fn spawn_market_poller(
    result_tx: mpsc::Sender<AppResult>,
    market_url: String,
    interval: Duration,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create the market poller runtime");
                return;
            }
        };

        loop {
            match runtime.block_on(fetch_market_data(&market_url)) {
                Ok(coins) => {
                    if result_tx.send(AppResult::MarketDataLoaded(coins)).is_err() {
                        info!("Market poller exiting (channel closed)");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = ?e, "Market poll failed, keeping the previous table");
                }
            }

            std::thread::sleep(interval);
        }
    });
}

// ============================================================================
// Event loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // Drain worker results without blocking.
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    let mut app_lock = app.lock().unwrap();
                    apply_result(&mut app_lock, result);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker channels disconnected");
                    break;
                }
            }
        }

        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }

        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

/// Applies one worker result to the shared state.
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::ProfileLoaded(profile) => {
            info!(account_id = profile.account_id, "Profile updated");
            app.set_profile(*profile);
        }
        AppResult::ProfileError(error) => {
            app.notify(
                NotificationKind::Error,
                format!("Profile refresh failed: {}", error),
            );
        }
        AppResult::MarketDataLoaded(coins) => {
            debug!(coins = coins.len(), "Market table replaced");
            app.set_prices(PriceTable::new(coins));
        }
        AppResult::TransferStageReached(stage) => {
            debug!(stage = stage.label(), "Transfer stage reached");
            app.apply_transfer_stage(stage);
        }
        AppResult::TransferFailed(error) => {
            app.transfer_failed(&error);
        }
        AppResult::TransferReset => {
            app.transfer_reset();
        }
        AppResult::SupportSent => {
            app.notify(NotificationKind::Success, "Message sent to support");
        }
        AppResult::SupportFailed(error) => {
            app.notify(
                NotificationKind::Error,
                format!("Failed to send message: {}", error),
            );
        }
    }
}

// ============================================================================
// Input handling
// ============================================================================

fn handle_event(
    app: &mut App,
    event: paydash::ui::events::Event,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    use paydash::ui::events::{
        get_char_from_event, is_back_tab_event, is_backspace_event, is_down_event,
        is_enter_event, is_escape_event, is_left_event, is_right_event, is_tab_event,
        is_up_event, Event,
    };

    let event = match event {
        Event::Key(_) => event,
        Event::Tick => return,
    };

    // Quit confirmation intercepts every key.
    if app.is_awaiting_quit_confirmation() {
        if get_char_from_event(&event) == Some('q') {
            info!("User confirmed quit");
            app.quit();
        } else {
            app.cancel_quit();
        }
        return;
    }

    // Esc hides the overlay first; the pipeline keeps running.
    if is_escape_event(&event) && app.transfer.overlay_visible {
        debug!("User dismissed the transfer overlay");
        app.dismiss_transfer_overlay();
        return;
    }

    match app.current_screen {
        // --------------------------------------------------------------
        // Screens without text input: digits switch screens, q quits.
        // --------------------------------------------------------------
        Screen::Overview | Screen::History | Screen::Deposit => {
            if let Some(c) = get_char_from_event(&event) {
                match c {
                    'q' => {
                        info!("User requested quit (awaiting confirmation)");
                        app.request_quit();
                    }
                    '1'..='5' => switch_screen(app, c),
                    'c' if app.current_screen == Screen::Overview => {
                        app.cycle_change_range();
                    }
                    'r' => {
                        let _ = command_tx.send(AppCommand::RefreshProfile);
                    }
                    _ => {}
                }
                return;
            }

            if is_up_event(&event) {
                app.navigate_up();
            } else if is_down_event(&event) {
                app.navigate_down();
            }
        }

        // --------------------------------------------------------------
        // Transfer form
        // --------------------------------------------------------------
        Screen::Transfer => {
            if is_escape_event(&event) {
                app.show_screen(Screen::Overview);
            } else if is_tab_event(&event) || is_down_event(&event) {
                app.transfer_next_field();
            } else if is_back_tab_event(&event) || is_up_event(&event) {
                app.transfer_previous_field();
            } else if is_enter_event(&event) {
                if let Some(request) = app.begin_transfer() {
                    info!(currency = %request.currency, "Transfer submitted");
                    let _ = command_tx.send(AppCommand::SubmitTransfer { request });
                }
            } else if app.transfer.active_field == TransferField::Currency {
                if is_right_event(&event) {
                    app.transfer_next_asset();
                } else if is_left_event(&event) {
                    app.transfer_previous_asset();
                }
            } else if is_backspace_event(&event) {
                app.transfer_backspace();
            } else if let Some(c) = get_char_from_event(&event) {
                app.transfer_push_char(c);
            }
        }

        // --------------------------------------------------------------
        // Support message
        // --------------------------------------------------------------
        Screen::Support => {
            if is_escape_event(&event) {
                app.show_screen(Screen::Overview);
            } else if is_enter_event(&event) {
                if let Some(message) = app.take_support_message() {
                    info!("Support message submitted");
                    let _ = command_tx.send(AppCommand::SendSupportMessage { message });
                }
            } else if is_backspace_event(&event) {
                app.support_input.pop();
            } else if let Some(c) = get_char_from_event(&event) {
                app.support_input.push(c);
            }
        }
    }
}

fn switch_screen(app: &mut App, digit: char) {
    let screen = match digit {
        '1' => Screen::Overview,
        '2' => Screen::Transfer,
        '3' => Screen::History,
        '4' => Screen::Deposit,
        '5' => Screen::Support,
        _ => return,
    };
    debug!(screen = screen.title(), "Screen switched");
    app.show_screen(screen);
}

// ============================================================================
// Terminal setup and restore
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
