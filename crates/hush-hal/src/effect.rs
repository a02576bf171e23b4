use std::sync::Arc;

use uuid::Uuid;

use crate::config::OpenParameters;
use crate::descriptor::Descriptor;
use crate::parameter::{Parameter, ParameterId, Specific};
use crate::Result;

/// Lifecycle state of an effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum State {
    #[strum(serialize = "INIT")]
    Init,
    #[strum(serialize = "IDLE")]
    Idle,
    #[strum(serialize = "PROCESSING")]
    Processing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum CommandId {
    #[strum(serialize = "START")]
    Start,
    #[strum(serialize = "STOP")]
    Stop,
    #[strum(serialize = "RESET")]
    Reset,
}

/// An opened (or openable) effect instance.
///
/// `Init --open--> Idle --Start--> Processing --Stop--> Idle --close--> Init`
pub trait Effect: Send + Sync {
    /// Open a session. Opening an already opened effect succeeds without change.
    fn open(&self, common: &OpenParameters, specific: Option<&Specific>) -> Result<()>;

    /// Close the session. Fails with `IllegalState` while processing.
    fn close(&self) -> Result<()>;

    fn descriptor(&self) -> Result<Descriptor>;

    fn state(&self) -> Result<State>;

    fn command(&self, command: CommandId) -> Result<()>;

    fn set_parameter(&self, param: &Parameter) -> Result<()>;

    fn get_parameter(&self, id: &ParameterId) -> Result<Parameter>;

    /// Run one block through the effect, returning the number of samples written.
    fn process(&self, input: &[f32], output: &mut [f32]) -> Result<usize>;
}

/// Creates and destroys effect instances for the implementations it hosts.
pub trait Factory: Send + Sync {
    /// Descriptors matching the given type and/or implementation uuid.
    /// `None` acts as a wildcard.
    fn query_effects(
        &self,
        type_uuid: Option<&Uuid>,
        uuid: Option<&Uuid>,
    ) -> Result<Vec<Descriptor>>;

    /// `Ok(None)` means the factory produced no instance.
    fn create_effect(&self, uuid: &Uuid) -> Result<Option<Arc<dyn Effect>>>;

    fn destroy_effect(&self, handle: &Arc<dyn Effect>) -> Result<()>;
}
