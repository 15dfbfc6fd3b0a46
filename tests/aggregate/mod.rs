use paystation::Aggregate;
pub use event_handler::*;
pub use structs::*;


/// A bare parking meter: it is fed minutes directly and never settles, which keeps the store and
/// manager tests independent from the pay station rules.
pub struct MeterAggregate;

#[derive(Clone, Debug, Default)]
pub struct MeterState {
    pub minutes: u32,
    pub feeds: u32,
}

impl Aggregate for MeterAggregate {
    const NAME: &'static str = "meter";
    type State = MeterState;
    type Command = MeterCommand;
    type Event = MeterEvent;
    type Error = MeterError;

    fn handle_command(state: &Self::State, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MeterCommand::Feed { minutes: 0 } => Err(MeterError::NothingFed),
            MeterCommand::Feed { minutes } => Ok(vec![MeterEvent::Fed { minutes }]),
            MeterCommand::FeedEach(batches) => {
                if batches.contains(&0) {
                    return Err(MeterError::NothingFed);
                }
                Ok(batches.into_iter().map(|minutes| MeterEvent::Fed { minutes }).collect())
            }
            MeterCommand::Expire if state.minutes == 0 => Err(MeterError::AlreadyExpired),
            MeterCommand::Expire => Ok(vec![MeterEvent::Expired]),
        }
    }

    fn apply_event(state: Self::State, payload: Self::Event) -> Self::State {
        match payload {
            MeterEvent::Fed { minutes } => Self::State {
                minutes: state.minutes + minutes,
                feeds: state.feeds + 1,
            },
            MeterEvent::Expired => Self::State { minutes: 0, ..state },
        }
    }
}
