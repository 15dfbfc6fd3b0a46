use crate::paystation::{Coin, PayStationCommand, PayStationError, PayStationEvent, PayStationState};
use crate::Aggregate;

#[derive(Clone)]
pub struct PayStationAggregate;

impl Aggregate for PayStationAggregate {
    const NAME: &'static str = "pay_station";
    type State = PayStationState;
    type Command = PayStationCommand;
    type Event = PayStationEvent;
    type Error = PayStationError;

    fn handle_command(state: &Self::State, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PayStationCommand::AddPayment { coin_value } => {
                let coin: Coin = Coin::try_from(coin_value)?;
                Ok(vec![PayStationEvent::CoinInserted { coin }])
            }
            PayStationCommand::Buy => Ok(vec![PayStationEvent::ParkingBought {
                minutes: state.time_bought(),
                amount: state.inserted_so_far(),
            }]),
            PayStationCommand::Cancel => Ok(vec![PayStationEvent::SessionCancelled {
                refund: state.refund(),
            }]),
            PayStationCommand::Empty => Ok(vec![PayStationEvent::TillEmptied {
                amount: state.total_bought(),
            }]),
        }
    }

    fn apply_event(state: Self::State, payload: Self::Event) -> Self::State {
        match payload {
            PayStationEvent::CoinInserted { coin } => state.insert(coin),
            PayStationEvent::ParkingBought { amount, .. } => state.credit(amount).reset_session(),
            PayStationEvent::SessionCancelled { .. } => state.reset_session(),
            // Emptying also drops whatever session was left open.
            PayStationEvent::TillEmptied { .. } => state.drain(),
        }
    }
}
