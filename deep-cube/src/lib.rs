#[cfg(feature = "torch")]
#[macro_use]
extern crate lazy_static;

#[cfg(feature = "torch")]
use tch::{Cuda, Device};

pub mod agent;
pub mod config;
pub mod error;
pub mod evaluation;
#[cfg(feature = "torch")]
pub mod model;
pub mod oracle;
pub mod search;

pub use agent::{Agent, TreeAgent};
pub use error::{OracleError, SearchError};
pub use evaluation::{DepthReport, Evaluator};
#[cfg(feature = "torch")]
pub use model::Net;
pub use oracle::{evaluate_batched, Eval, MisplacedOracle, Oracle, Policy, UniformOracle};

#[cfg(feature = "torch")]
lazy_static! {
    static ref DEVICE: Device = Device::cuda_if_available();
}

/// Try initializing CUDA.
/// Returns whether CUDA is available.
#[cfg(feature = "torch")]
pub fn use_cuda() -> bool {
    tch::maybe_init_cuda();
    Cuda::is_available()
}
