use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser};
use humantime::parse_rfc3339;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use fresh_start_site::carousel::CarouselKind;
use fresh_start_site::config::Configuration;
use fresh_start_site::events::{CarouselCommand, CarouselMoved};
use fresh_start_site::site::bindings::{self, PageBindings};
use fresh_start_site::site::clipboard::MemoryClipboard;
use fresh_start_site::site::consent::{ConsentBanner, PageConsent, PreferenceStore, ResetButton};
use fresh_start_site::site::counter::START_DELAY;
use fresh_start_site::site::nav::ClickTarget;
use fresh_start_site::site::notify::{FADE_OUT, NotificationKind, SHOW_FOR, ToastId};
use fresh_start_site::site::scroll::{hero_min_height, parallax_offset};
use fresh_start_site::site::seasonal::show_remembrance_poppy;
use fresh_start_site::tasks;
use fresh_start_site::tasks::carousel::HeadlessCarousel;
use fresh_start_site::tasks::contact::{ContactRequest, HttpFormEndpoint, SubmitOutcome};
use fresh_start_site::tasks::reviews::{PlacesClient, ReviewsProvider, ReviewsView, load_reviews};

#[derive(Debug, Parser)]
#[command(
    name = "fresh-start-site",
    version,
    about = "headless runner for the Fresh Start Driving site behaviour"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Print the student carousel's cursor plan for N auto-advance ticks and exit
    #[arg(long = "dry-run", value_name = "TICKS")]
    dry_run: Option<usize>,
    /// Pretend the page loads at this RFC 3339 instant (review ages, seasonal content)
    #[arg(long = "now", value_name = "RFC3339")]
    now: Option<String>,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Prev,
    ReviewNext,
    ReviewPrev,
    Resize(f32),
    Menu,
    Faq(usize),
    Service(String),
    Escape,
    Accept,
    Reject,
    ResetConsent,
    Scroll(f32),
    Copy(usize),
    Submit(ContactRequest),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let (word, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .map_or((line.trim(), ""), |(w, r)| (w, r.trim()));
    let cmd = match word {
        "next" => Command::Next,
        "prev" => Command::Prev,
        "review-next" => Command::ReviewNext,
        "review-prev" => Command::ReviewPrev,
        "resize" => Command::Resize(rest.parse().ok()?),
        "menu" => Command::Menu,
        "faq" => Command::Faq(rest.parse().ok()?),
        "service" if !rest.is_empty() => Command::Service(rest.to_string()),
        "escape" => Command::Escape,
        "accept" => Command::Accept,
        "reject" => Command::Reject,
        "reset-consent" => Command::ResetConsent,
        "scroll" => Command::Scroll(rest.parse().ok()?),
        "copy" => Command::Copy(rest.parse().ok()?),
        "submit" => Command::Submit(ContactRequest::from_query(rest)),
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("fresh_start_site={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        dry_run,
        now,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let now: DateTime<Utc> = match now {
        Some(ts) => parse_rfc3339(&ts)
            .context("failed to parse --now")?
            .into(),
        None => Utc::now(),
    };

    let cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    tracing::debug!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    if let Some(ticks) = dry_run {
        run_dry_run(&cfg, ticks);
        return Ok(());
    }

    tracing::info!(
        min_height = hero_min_height(cfg.viewport.height, cfg.viewport.header_height),
        "hero sized"
    );
    if show_remembrance_poppy(now.date_naive()) {
        tracing::info!("remembrance poppy shown");
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            tracing::info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let mut page = PageBindings::resolve(&cfg);

    let students = bindings::student_carousel(&cfg);
    let reviews = match &cfg.testimonials {
        Some(section) => {
            let provider = PlacesClient::from_config(section).unwrap_or_else(|err| {
                tracing::warn!("reviews client unavailable: {err}");
                None
            });
            let view = load_reviews(
                provider.as_ref().map(|p| p as &dyn ReviewsProvider),
                section,
                now,
            )
            .await;
            if let ReviewsView::Live { summary, .. } = &view {
                tracing::info!(score = ?summary.score, total = ?summary.text, "rating summary");
            }
            Some(view)
        }
        None => None,
    };
    let no_reviews = ReviewsView::Fallback { cards: Vec::new() };
    let testimonials = bindings::testimonial_carousel(&cfg, reviews.as_ref().unwrap_or(&no_reviews));

    // Channels (small/bounded)
    let (student_tx, student_rx) = mpsc::channel::<CarouselCommand>(16); // Host -> students
    let (review_tx, review_rx) = mpsc::channel::<CarouselCommand>(16); // Host -> testimonials
    let (moved_tx, mut moved_rx) = mpsc::channel::<CarouselMoved>(64); // Carousels -> log

    let mut tasks = JoinSet::new();

    for (kind, controller, commands) in [
        (CarouselKind::Students, students, student_rx),
        (CarouselKind::Testimonials, testimonials, review_rx),
    ] {
        let moved = moved_tx.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            tasks::carousel::run(kind, controller, commands, moved, cancel)
                .await
                .map(|_| ())
                .with_context(|| format!("{kind} carousel task failed"))
        });
    }
    drop(moved_tx);

    tasks.spawn(async move {
        while let Some(ev) = moved_rx.recv().await {
            tracing::info!(
                carousel = %ev.carousel,
                cursor = ev.cursor,
                item = ev.source_index,
                "carousel moved"
            );
        }
        Ok(())
    });

    let mut consent = PageConsent::open(cfg.consent.store_path.as_deref());
    if consent.is_visible() {
        tracing::info!("cookie banner shown");
    }
    let mut reset_button = ResetButton::default();

    let endpoint = match &cfg.contact_form {
        Some(form) => Some(
            HttpFormEndpoint::from_config(form).context("failed to build contact form client")?,
        ),
        None => None,
    };

    let mut clipboard = MemoryClipboard::default();
    on_page_scroll(&mut page, &cfg, 0.0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut button_reset: Option<Instant> = None;
    let mut counters_played = false;
    let mut counter_start = (!page.counters.is_empty()).then(|| Instant::now() + START_DELAY);
    let mut page_reload: Option<Instant> = None;
    let mut copy_reverts: Vec<(usize, Instant)> = Vec::new();
    let mut toast_removal: Option<(ToastId, Instant)> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            _ = wait_for(button_reset) => {
                button_reset = None;
                if let Some(form) = page.contact.as_mut() {
                    form.button.reset();
                    tracing::debug!(label = %form.button.label(), "submit button reset");
                }
            }

            _ = wait_for(counter_start) => {
                counter_start = None;
                play_counters(&mut page, &mut counters_played);
            }

            _ = wait_for(page_reload) => {
                page_reload = None;
                consent = PageConsent::open(cfg.consent.store_path.as_deref());
                reset_button = ResetButton::default();
                tracing::info!(banner_visible = consent.is_visible(), "page reloaded");
            }

            _ = wait_for(copy_reverts.iter().map(|(_, at)| *at).min()) => {
                let now = Instant::now();
                copy_reverts.retain(|&(index, at)| {
                    if at > now {
                        return true;
                    }
                    if let Some(item) = page.contact_details.get_mut(index) {
                        item.revert();
                    }
                    false
                });
            }

            _ = wait_for(toast_removal.map(|(_, at)| at)) => {
                if let Some(toast) = toast_removal.take().and_then(|(id, _)| page.toasts.remove(id)) {
                    tracing::debug!(message = %toast.message, "notification removed");
                }
            }

            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::info!("stdin closed; initiating shutdown");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(cmd) = parse_command(&line) else {
                    tracing::warn!(input = %line.trim(), "unrecognised command");
                    continue;
                };
                match cmd {
                    Command::Quit => break,
                    Command::Next => forward(&student_tx, CarouselCommand::Next).await,
                    Command::Prev => forward(&student_tx, CarouselCommand::Prev).await,
                    Command::ReviewNext => forward(&review_tx, CarouselCommand::Next).await,
                    Command::ReviewPrev => forward(&review_tx, CarouselCommand::Prev).await,
                    Command::Resize(width) => {
                        forward(&student_tx, CarouselCommand::Resize { width }).await;
                        forward(&review_tx, CarouselCommand::Resize { width }).await;
                    }
                    Command::Menu => match page.nav.as_mut() {
                        Some(nav) => {
                            nav.click(ClickTarget::MenuToggle);
                            tracing::info!(open = nav.is_open(), "mobile menu toggled");
                        }
                        None => tracing::debug!("no mobile menu on page"),
                    },
                    Command::Faq(index) => match page.faq.as_mut() {
                        Some(faq) => {
                            faq.toggle(index);
                            tracing::info!(
                                open = ?faq.open_index(),
                                max_height = faq.max_height(index),
                                "faq toggled"
                            );
                        }
                        None => tracing::debug!("no faq on page"),
                    },
                    Command::Service(key) => match page.modal.as_mut() {
                        Some(modal) => match modal.open(&key) {
                            Some(html) => {
                                tracing::info!(service = %key, "service modal opened");
                                println!("{html}");
                            }
                            None => tracing::warn!(service = %key, "unknown service"),
                        },
                        None => tracing::debug!("no service modal on page"),
                    },
                    Command::Escape => {
                        if let Some(modal) = page.modal.as_mut() {
                            modal.key("Escape");
                        }
                        if let Some(nav) = page.nav.as_mut().filter(|nav| nav.is_open()) {
                            nav.click(ClickTarget::Elsewhere);
                        }
                    }
                    Command::Accept => {
                        if let Err(err) = consent.accept() {
                            tracing::warn!(error = %format!("{err:#}"), "could not store consent");
                        }
                        log_consent(&consent);
                    }
                    Command::Reject => {
                        if let Err(err) = consent.reject() {
                            tracing::warn!(error = %format!("{err:#}"), "could not store consent");
                        }
                        log_consent(&consent);
                    }
                    Command::ResetConsent => match reset_button.click(&mut consent) {
                        Ok(Some(delay)) => {
                            tracing::info!(
                                label = reset_button.label(),
                                disabled = reset_button.is_disabled(),
                                "consent reset; reloading shortly"
                            );
                            page_reload = Some(Instant::now() + delay);
                        }
                        Ok(None) => tracing::debug!("reset already pending"),
                        Err(err) => {
                            tracing::warn!(error = %format!("{err:#}"), "could not reset consent");
                        }
                    },
                    Command::Scroll(y) => {
                        page.scroll.on_scroll(y);
                        tracing::info!(
                            header_hidden = page.scroll.header_hidden(),
                            back_to_top = page.scroll.back_to_top_visible(),
                            parallax = ?parallax_offset(y, cfg.viewport.hero_height),
                            "page scrolled"
                        );
                        on_page_scroll(&mut page, &cfg, y);
                        if y >= cfg.viewport.hero_height {
                            play_counters(&mut page, &mut counters_played);
                        }
                    }
                    Command::Copy(index) => match page.contact_details.get_mut(index) {
                        Some(item) => {
                            if let Some(show_for) = item.click(&mut clipboard) {
                                tracing::info!(text = item.text(), label = item.label(), "contact detail copied");
                                copy_reverts.retain(|(i, _)| *i != index);
                                copy_reverts.push((index, Instant::now() + show_for));
                            }
                        }
                        None => tracing::debug!(index, "no such contact detail"),
                    },
                    Command::Submit(request) => {
                        let (Some(form), Some(endpoint)) = (page.contact.as_mut(), endpoint.as_ref())
                        else {
                            tracing::debug!("no contact form on page");
                            continue;
                        };
                        form.fields = request;
                        let outcome = form.submit(endpoint).await;
                        tracing::info!(button = %form.button.label(), ?outcome, "contact form submitted");
                        if outcome != SubmitOutcome::Busy {
                            button_reset = Some(Instant::now() + form.reset_after());
                        }
                        if outcome == SubmitOutcome::Sent {
                            let id = page
                                .toasts
                                .show("Message sent successfully!", NotificationKind::Success);
                            tracing::info!("notification shown: Message sent successfully!");
                            toast_removal = Some((id, Instant::now() + SHOW_FOR + FADE_OUT));
                        }
                    }
                }
            }
        }
    }

    // Ensure carousel tasks are asked to stop
    drop(student_tx);
    drop(review_tx);
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

async fn forward(tx: &mpsc::Sender<CarouselCommand>, cmd: CarouselCommand) {
    if let Err(err) = tx.send(cmd).await {
        tracing::debug!("carousel no longer listening: {err}");
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn log_consent<P: PreferenceStore>(banner: &ConsentBanner<P>) {
    match banner.status() {
        Ok(status) => tracing::info!(
            banner_visible = banner.is_visible(),
            class = status.class,
            "{}",
            status.text
        ),
        Err(err) => tracing::warn!(
            banner_visible = banner.is_visible(),
            error = %format!("{err:#}"),
            "consent status unavailable"
        ),
    }
}

/// Runs every stat counter to its final value, once per page load.
fn play_counters(page: &mut PageBindings, played: &mut bool) {
    if *played {
        return;
    }
    *played = true;
    for (stat, anim) in page.counters.iter_mut() {
        let frame = anim.finish();
        tracing::info!(
            stat = %stat.label,
            value = %frame.text,
            stars = frame.stars.as_deref().unwrap_or(""),
            "counter finished"
        );
    }
}

/// Scroll-driven effects that depend on element positions.
fn on_page_scroll(page: &mut PageBindings, cfg: &Configuration, scroll_top: f32) {
    let viewport_height = cfg.viewport.height;
    if let Some(skills) = page.skills.as_mut() {
        if skills.on_scroll(scroll_top, viewport_height) {
            tracing::debug!(shadows = ?skills.shadows(), "skill card shadows updated");
        }
    }
    for index in page.reveal.on_scroll(scroll_top, viewport_height) {
        if let Some(target) = page.reveal.target(index) {
            tracing::info!(index, kind = ?target.kind, "faded in");
        }
    }
}

fn run_dry_run(cfg: &Configuration, ticks: usize) {
    let Some(section) = cfg.student_carousel.as_ref() else {
        println!("(no student carousel configured)");
        return;
    };
    let mut carousel = bindings::student_carousel(cfg);
    println!(
        "# carousel dry run\n# images: {}\n# auto-advance: {}\n# ticks: {}\n",
        carousel.sequence().map_or(0, |seq| seq.source_len()),
        humantime::format_duration(section.auto_advance),
        ticks
    );
    if !carousel.is_active() {
        println!(
            "(no student images discovered under {})",
            section.image_dir.display()
        );
        return;
    }

    println!("# planned positions (slot after move -> slot after settle):");
    for step in plan_moves(&mut carousel, section.auto_advance, section.settle_delay, ticks) {
        println!(
            "  {:>4}: {:>3} -> {:>3}  {}",
            step.tick, step.moved, step.settled, step.label
        );
    }
}

#[derive(Debug, PartialEq)]
struct PlannedMove {
    tick: usize,
    moved: usize,
    settled: usize,
    label: String,
}

/// Runs the virtual timeline through `ticks` auto-advance periods, recording
/// the cursor after each move and after its settle. Stops early once a tick's
/// time no longer fits in a `Duration`.
fn plan_moves(
    carousel: &mut HeadlessCarousel,
    period: Duration,
    settle: Duration,
    ticks: usize,
) -> Vec<PlannedMove> {
    let mut plan = Vec::new();
    for tick in 1..=ticks {
        let times = u32::try_from(tick)
            .ok()
            .and_then(|n| period.checked_mul(n))
            .and_then(|at| Some((at, at.checked_add(settle)?)));
        let Some((at, settled_at)) = times else {
            tracing::warn!(tick, "tick time out of range; plan truncated");
            break;
        };
        carousel.run_until(at);
        let moved = carousel.cursor().unwrap_or_default();
        carousel.run_until(settled_at);
        plan.push(PlannedMove {
            tick,
            moved,
            settled: carousel.cursor().unwrap_or_default(),
            label: carousel
                .current_item()
                .map(|item| item.label().to_string())
                .unwrap_or_default(),
        });
    }
    plan
}
