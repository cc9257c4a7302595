//! Progress reporting around recipe execution.
//!
//! Each decorator implements the same parser trait as the engine level it
//! wraps and writes to the IO sink before (and for actions, after)
//! delegating. Module output is indented by [`MarginIO`].
//!
//! [`instrumented_parser`] assembles the full chain:
//!
//! ```text
//! Running recipe "deploy"
//!
//! - Running step "prepare"
//!   + Running action "create dir"
//!      >Created /srv/app
//!     => OK (1 iteration)
//!
//! Execution finished.
//! ```

pub mod action;
pub mod margin;
pub mod recipe;
pub mod step;

pub use action::{result_line, InstrumentedActionParser};
pub use margin::{Margin, MarginIO, DEFAULT_MARGIN, MARGIN_MARKER};
pub use recipe::InstrumentedRecipeParser;
pub use step::InstrumentedStepParser;

use crate::engine::{
    ModuleMethodExecutor, StandardActionParser, StandardRecipeParser, StandardStepParser,
};

/// The fully instrumented parser chain.
pub type InstrumentedChain = InstrumentedRecipeParser<
    StandardRecipeParser<
        InstrumentedStepParser<StandardStepParser<InstrumentedActionParser<StandardActionParser>>>,
    >,
>;

/// Build the instrumented chain around `executor`.
pub fn instrumented_parser(executor: ModuleMethodExecutor) -> InstrumentedChain {
    let action = InstrumentedActionParser::new(StandardActionParser::new(executor));
    let step = InstrumentedStepParser::new(StandardStepParser::new(action));
    InstrumentedRecipeParser::new(StandardRecipeParser::new(step))
}
