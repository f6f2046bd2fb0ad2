//! End-of-day settlement.

use crate::error::ClubError;
use crate::metrics::ClubMetrics;
use crate::reducer::Outputs;
use crate::types::{ClubOutput, ClubState, Presence};
use computer_club_core::environment::Tariff;

/// Closes the club
///
/// Everyone still inside is forced out in ascending name order, seated
/// clients have their interval settled at closing time, and the queue is
/// emptied. Then the closing time and one summary per place are reported.
///
/// # Errors
///
/// Returns [`ClubError`] if a seated client's place is not actually
/// occupied.
pub fn close_day<T: Tariff + ?Sized>(state: &mut ClubState, tariff: &T) -> Result<Outputs, ClubError> {
    let close = state.config().close();
    let mut outputs = Outputs::new();

    let evicted = state.present_count();
    for client in state.present_clients_sorted() {
        match state.presence(&client) {
            Some(Presence::At(place)) => {
                let settled = state.vacate(close, &client, place, tariff)?;
                ClubMetrics::record_settlement(&settled);
            },
            Some(Presence::Unseated) | None => state.dismiss(&client),
        }
        ClubMetrics::record_forced_out();
        outputs.push(ClubOutput::ForcedOut { time: close, client });
    }
    state.clear_queue();

    outputs.push(ClubOutput::Closed { time: close });

    let mut total = 0;
    for (place, slot) in state.places() {
        total += slot.revenue();
        outputs.push(ClubOutput::Summary {
            place,
            revenue: slot.revenue(),
            busy: slot.busy(),
        });
    }

    tracing::info!(
        time = %close,
        forced_out = evicted,
        revenue = total,
        "Club closed"
    );

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClubConfig, Minutes, PlaceId};
    use computer_club_core::environment::HourlyTariff;

    fn at(hm: &str) -> Minutes {
        hm.parse().unwrap()
    }

    fn place(n: u32) -> PlaceId {
        PlaceId::new(n).unwrap()
    }

    fn forced(client: &str) -> ClubOutput {
        ClubOutput::ForcedOut {
            time: at("19:00"),
            client: client.to_string(),
        }
    }

    #[test]
    fn empty_club_reports_zero_summaries() {
        let mut state = ClubState::new(ClubConfig::new(2, at("09:00"), at("19:00"), 10).unwrap());

        let outputs = close_day(&mut state, &HourlyTariff::new(10)).unwrap();

        assert_eq!(
            outputs.as_slice(),
            &[
                ClubOutput::Closed { time: at("19:00") },
                ClubOutput::Summary {
                    place: place(1),
                    revenue: 0,
                    busy: Minutes::ZERO,
                },
                ClubOutput::Summary {
                    place: place(2),
                    revenue: 0,
                    busy: Minutes::ZERO,
                },
            ]
        );
    }

    #[test]
    fn everyone_leaves_in_name_order() {
        let tariff = HourlyTariff::new(10);
        let mut state = ClubState::new(ClubConfig::new(2, at("09:00"), at("19:00"), 10).unwrap());
        state.admit("zed".to_string());
        state.seat(at("18:30"), "bob".to_string(), place(2)).unwrap();
        state.admit("Amy".to_string());
        state.enqueue("zed".to_string());

        let outputs = close_day(&mut state, &tariff).unwrap();

        assert_eq!(&outputs[..3], &[forced("Amy"), forced("bob"), forced("zed")]);
        assert_eq!(
            outputs[5],
            ClubOutput::Summary {
                place: place(2),
                revenue: 10,
                busy: Minutes::new(30),
            }
        );
        assert_eq!(state.present_count(), 0);
        assert_eq!(state.queue_len(), 0);
        assert!(state.places().all(|(_, slot)| !slot.is_occupied()));
    }
}
