use std::path::PathBuf;
use std::time::Duration;

use async_channel::{Sender, bounded};
use tokio::signal;
use tokio::time::sleep;
use tracing::{info, warn};

use toaster::Result;
use toaster::Toaster;
use toaster::config::Config;
use toaster::dom::NodeId;
use toaster::error::ScriptError;
use toaster::telemetry::init_tracing;

use super::cli::Cli;
use super::script::{self, Action, Step};

const DEFAULT_CONFIG: &str = "toaster.toml";
const STEP_QUEUE: usize = 64;

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::from_env_and_file(&config_path)?;
    let steps = script::load(&cli.script)?;
    info!(
        version = toaster::VERSION,
        script = %cli.script.display(),
        steps = steps.len(),
        "script loaded"
    );

    let (tx, rx) = bounded(STEP_QUEUE);
    let feeder = tokio::spawn(feed(steps, tx));

    let mut engine = Toaster::new(config);
    let mut index = 0;
    loop {
        let step = tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received, stopping script");
                break;
            }
            step = rx.recv() => match step {
                Ok(step) => step,
                Err(_) => break,
            },
        };
        advance(&mut engine, step.at, cli.realtime).await;
        apply(&mut engine, index, step.action)?;
        index += 1;
    }

    rx.close();
    if let Err(err) = feeder.await {
        warn!(error = %err, "feeder task terminated unexpectedly");
    }

    let drain_until = engine.now().saturating_add(cli.drain);
    tokio::select! {
        biased;
        _ = signal::ctrl_c() => info!("shutdown signal received, skipping drain"),
        () = advance(&mut engine, drain_until, cli.realtime) => {}
    }

    info!(
        steps = index,
        toasts = engine.toasts().len(),
        containers = engine.containers().len(),
        now = ?engine.now(),
        "script finished"
    );
    if cli.dump {
        let document = engine.document();
        println!("{}", document.outer_html(document.body()));
    }
    Ok(())
}

/// Push steps in order; stops early once the receiver is gone.
async fn feed(steps: Vec<Step>, tx: Sender<Step>) {
    for step in steps {
        if tx.send(step).await.is_err() {
            break;
        }
    }
}

/// Move the engine clock to `until`, sleeping between deadlines in realtime mode.
async fn advance(engine: &mut Toaster, until: Duration, realtime: bool) {
    if !realtime {
        engine.advance_to(until);
        return;
    }
    while engine.now() < until {
        let now = engine.now();
        let next = engine
            .next_deadline()
            .map_or(until, |deadline| deadline.min(until))
            .max(now);
        sleep(next - now).await;
        engine.advance_to(next);
    }
}

pub(super) fn apply(engine: &mut Toaster, index: usize, action: Action) -> Result<()> {
    let name = action.name();
    match action {
        Action::Notify(request) => {
            let created = engine.notify(request);
            info!(step = index, action = name, created = created.len(), "step applied");
        }
        Action::Clear => {
            let removed = engine.clear();
            info!(step = index, action = name, removed, "step applied");
        }
        Action::Blur => {
            engine.blur();
            info!(step = index, action = name, "step applied");
        }
        targeted => {
            let (toast, changed) = apply_to_toast(engine, index, &targeted)?;
            info!(step = index, action = name, %toast, changed, "step applied");
        }
    }
    Ok(())
}

fn apply_to_toast(engine: &mut Toaster, index: usize, action: &Action) -> Result<(NodeId, bool)> {
    let position = match *action {
        Action::Hover { toast }
        | Action::Leave { toast }
        | Action::Click { toast }
        | Action::Close { toast }
        | Action::Focus { toast }
        | Action::Dismiss { toast, .. } => toast,
        Action::Notify(_) | Action::Blur | Action::Clear => 0,
    };
    let node = live_toast(engine, index, position)?;
    let changed = match *action {
        Action::Hover { .. } => engine.pointer_enter(node),
        Action::Leave { .. } => engine.pointer_leave(node),
        Action::Click { .. } => engine.click(node),
        Action::Close { .. } => match engine.close_button(node) {
            Some(button) => engine.click(button),
            None => {
                warn!(step = index, toast = %node, "toast has no close button, forcing dismissal");
                engine.dismiss(node, true)
            }
        },
        Action::Focus { .. } => {
            let inner = engine
                .close_button(node)
                .or_else(|| engine.document().children(node).first().copied())
                .unwrap_or(node);
            engine.focus(inner)
        }
        Action::Dismiss { force, .. } => engine.dismiss(node, force),
        Action::Notify(_) | Action::Blur | Action::Clear => false,
    };
    Ok((node, changed))
}

fn live_toast(engine: &Toaster, index: usize, toast: usize) -> Result<NodeId> {
    let live = engine.toasts();
    live.get(toast).copied().ok_or_else(|| {
        ScriptError::UnknownToast {
            index,
            toast,
            live: live.len(),
        }
        .into()
    })
}
