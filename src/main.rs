use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_client::{
    auth::EnvToken,
    config::Config,
    seatmap::SeatMapLayout,
    session::{BookingSession, BookingSummary},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = env::args().skip(1);
    let Some(show_id) = args.next() else {
        // No show chosen: nothing to load, show usage and leave.
        eprintln!("Usage: booking_client <show-id> [seat-label ...] [--pay]");
        eprintln!("Example: booking_client 42 A-1 L-2 --pay");
        return Ok(());
    };

    let mut pay_after = false;
    let mut seat_labels = Vec::new();
    for arg in args {
        if arg == "--pay" {
            pay_after = true;
        } else {
            seat_labels.push(arg);
        }
    }

    info!("Starting booking client for show {}", show_id);

    // Token comes from the auth collaborator; here that is the environment.
    let state = AppState::new(config.clone(), Arc::new(EnvToken::new("AUTH_TOKEN")));
    let layout = SeatMapLayout::from_config(&config.seat_map);
    let mut session = BookingSession::new(
        show_id,
        layout,
        state.backend.clone(),
        state.cache.clone(),
    );

    session.load(None).await;

    match session.movie() {
        Some(movie) => println!("{}\n{}", movie.title, movie.tagline()),
        None => println!("Select seats"),
    }
    if let Some(show) = session.show() {
        println!("{} • {}", show.formatted_start_time(), show.auditorium_name());
    }
    println!();
    print!("{}", render_seat_map(&session));

    if let Some(pending) = session.pending_booking() {
        println!(
            "An unpaid booking ({}) already exists for this show. Pay or cancel it from your bookings first.",
            pending.id
        );
    }

    if seat_labels.is_empty() {
        println!("No seats requested; nothing to book.");
        return Ok(());
    }

    for label in &seat_labels {
        if !session.toggle_seat(label) {
            warn!("seat {} is unavailable or unknown, skipping", label);
        }
    }
    if session.selected_labels().is_empty() {
        bail!("none of the requested seats could be selected");
    }

    let summary = session
        .begin_confirmation()
        .context("cannot proceed to confirmation")?;
    print_summary(&summary);

    let handoff = session.submit().await.context("booking was not created")?;
    println!(
        "\nBooking {} created — ₹{} due for seats {}.",
        handoff.booking_id,
        handoff.total_amount,
        handoff.seat_labels.join(", ")
    );

    if pay_after {
        state
            .backend
            .pay(&handoff.booking_id, handoff.total_amount)
            .await
            .context("payment failed")?;
        println!("Payment accepted, booking confirmed.");
    } else {
        println!("Run with --pay to settle immediately, or pay from your bookings.");
    }

    Ok(())
}

// Текстовый рендер схемы зала
fn render_seat_map(session: &BookingSession) -> String {
    let layout = *session.seat_map().layout();
    let availability = session.availability();
    let mut out = String::new();

    out.push_str("          [ SCREEN ]\n\n");
    for row_index in 0..layout.rows_count() {
        // Blank line where the premium block starts
        if layout.is_premium(row_index)
            && row_index == layout.rows_count() - layout.premium_row_count()
        {
            out.push('\n');
        }
        out.push(SeatMapLayout::row_letter(row_index));
        out.push(' ');
        for seat_number in 1..=layout.seats_per_row() {
            let label = layout.label(row_index, seat_number);
            let glyph = if session.seat_map().is_selected(&label) {
                "[o]"
            } else if availability.is_unavailable(layout.seat_id(row_index, seat_number)) {
                "[x]"
            } else {
                "[ ]"
            };
            out.push_str(glyph);
        }
        out.push('\n');
    }
    out.push_str("\n[ ] available  [x] taken  [o] selected  (back rows premium)\n");
    out
}

fn print_summary(summary: &BookingSummary) {
    println!("\nConfirm booking");
    if let Some(title) = &summary.movie_title {
        println!("  {title}");
    }
    println!("  {} • {}", summary.show_time, summary.auditorium);
    for seat in &summary.seats {
        let kind = if seat.premium { "premium" } else { "regular" };
        println!("  {:>6}  {:>8}  ₹{}", seat.label, kind, seat.price);
    }
    println!("  Total: ₹{}", summary.total_amount);
}
