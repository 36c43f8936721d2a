//! Alrock Burger booking demo
//!
//! Walks one guest through the booking wizard, then cancels the reservation
//! the way the cancellation page would, with the 2 second processing pause.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use alrock_core::environment::{Clock, SystemClock};
use alrock_reservations::{
    BookingSettings, Restaurant, RestaurantAction, RestaurantEnvironment, RestaurantStore,
    booking::BookingInput,
    build_store,
    cancellation::CancellationReason,
    types::{BookingId, PartySize, RequestId, TableId, TimeSlot},
};
use alrock_testing::SimulatedLatency;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alrock_reservations=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🍔 ============================================");
    println!("   Alrock Burger - Reservation Demo");
    println!("============================================\n");

    let settings = BookingSettings::default();
    let clock = Arc::new(SystemClock);
    let store = build_store(
        Restaurant::seeded(settings.utc_offset)?,
        RestaurantEnvironment::new(
            clock.clone(),
            Arc::new(SimulatedLatency(Duration::from_secs(2))),
            settings,
        ),
    );

    let party_size = PartySize::new(4)?;
    let date = settings.today(clock.now()) + chrono::Duration::days(7);

    // Step 1: what can a party of four book?
    let available: Vec<String> = store
        .state(|s| {
            s.restaurant
                .available_tables(party_size)
                .iter()
                .map(|t| t.id.to_string())
                .collect()
        })
        .await;
    println!("1️⃣  Tables for {party_size} guests: {}", available.join(", "));
    let Some(table) = available.first().cloned() else {
        return Err("no table available for the demo party".into());
    };

    // Step 2: the wizard, one input at a time
    println!("\n2️⃣  Booking table {table} on {date} at 20:00...");
    let booking_id = BookingId::new();
    send(&store, |request_id| RestaurantAction::StartBooking {
        request_id,
        booking_id,
    })
    .await?;

    let inputs = [
        BookingInput::SetDate { date },
        BookingInput::SetTime {
            time: TimeSlot::new(20, 0)?,
        },
        BookingInput::SetPartySize {
            party_size: party_size.get(),
        },
        BookingInput::Next,
        BookingInput::SelectTable {
            table_id: TableId::new(table.as_str()),
        },
        BookingInput::Next,
        BookingInput::SetName {
            name: "Lucía Pérez".to_string(),
        },
        BookingInput::SetPhone {
            phone: "+34 600 111 222".to_string(),
        },
        BookingInput::SetEmail {
            email: "lucia@example.com".to_string(),
        },
    ];
    for input in inputs {
        println!("   → {input:?}");
        send(&store, |request_id| RestaurantAction::UpdateBooking {
            request_id,
            booking_id,
            input,
        })
        .await?;
    }

    let RestaurantAction::BookingSubmitted { created, .. } =
        send(&store, |request_id| RestaurantAction::SubmitBooking {
            request_id,
            booking_id,
        })
        .await?
    else {
        return Err("booking was not submitted".into());
    };
    let reservation_id = created.reservation.id.clone();
    println!("   ✓ Reservation {reservation_id} is {}", created.reservation.status);
    if let Some(table) = &created.table {
        println!("   ✓ Table {} held until {:?}", table.number, table.reserved_until);
    }

    // Step 3: the cancellation page
    println!("\n3️⃣  Looking up lucia@example.com and cancelling (2s pause)...");
    let found = store
        .state(|s| {
            s.restaurant
                .reservations()
                .find_by_term("lucia@example.com")
                .map(|r| r.id.clone())
        })
        .await?;

    let RestaurantAction::ReservationCancelled { outcome, .. } =
        send(&store, |request_id| RestaurantAction::CancelReservation {
            request_id,
            reservation_id: found,
            reason: CancellationReason::ChangeOfPlans,
        })
        .await?
    else {
        return Err("reservation was not cancelled".into());
    };
    println!("   ✓ Notes: {:?}", outcome.reservation.notes);
    println!("   ✓ Charge: {}% of the minimum menu", outcome.charge.percent());
    if let Some(table) = &outcome.released_table {
        println!("   ✓ Table {} is {} again", table.number, table.status);
    }

    // Step 4: the wizard resets itself
    tokio::time::sleep(settings.reset_delay + Duration::from_millis(200)).await;
    let stage = store
        .state(|s| s.booking(&booking_id).map(|b| b.stage()))
        .await;
    println!("\n4️⃣  Wizard after the reset delay: {stage:?}");

    // Step 5: dashboard
    let stats = store
        .state(|s| s.restaurant.stats(settings.today(clock.now())))
        .await;
    println!(
        "\n5️⃣  Dashboard: {} reservations, {} pending, occupancy {}%",
        stats.total_reservations, stats.pending_reservations, stats.occupancy_rate
    );

    store.shutdown(Duration::from_secs(5)).await?;
    println!("\n✅ Demo complete\n");
    Ok(())
}

/// Send a command and wait for its outcome, turning rejections into errors
async fn send<F>(store: &RestaurantStore, command: F) -> Result<RestaurantAction, Box<dyn std::error::Error>>
where
    F: FnOnce(RequestId) -> RestaurantAction,
{
    let request_id = RequestId::new();
    let outcome = store
        .send_and_wait_for(
            command(request_id),
            |action| action.is_outcome_for(request_id),
            Duration::from_secs(5),
        )
        .await?;

    match outcome {
        RestaurantAction::CommandRejected { error, .. } => Err(error.into()),
        event => Ok(event),
    }
}
