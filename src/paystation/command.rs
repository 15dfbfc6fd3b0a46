/// Actions a customer, or the operator, can perform on a pay station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayStationCommand {
    /// Insert a coin. The value is in cents and is validated by the aggregate.
    AddPayment { coin_value: u32 },
    /// Buy parking time with the coins inserted so far.
    Buy,
    /// Abort the session, asking for the inserted coins back.
    Cancel,
    /// Collect the money earned since the last time the till was emptied.
    Empty,
}
