use typed_builder::TypedBuilder;
use uuid::Uuid;

#[derive(TypedBuilder, Debug, Clone)]
pub struct PayStationConfig {
    /// Aggregate id of the station. Reusing the id of an existing station resumes its history.
    #[builder(default = Uuid::new_v4())]
    pub(crate) id: Uuid,
    /// Human readable name, attached to every log line emitted by the station.
    #[builder(default = String::from("pay-station"), setter(into))]
    pub(crate) name: String,
}

impl Default for PayStationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
