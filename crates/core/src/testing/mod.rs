//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use speedshift_core::testing::MockProcessor;
//!
//! let processor = Arc::new(MockProcessor::new());
//! processor.fail_with(1, "Invalid data found").await;
//!
//! let runner = TranscodeRunner::new(processor.clone(), config);
//! ```

mod mock_processor;

pub use mock_processor::MockProcessor;
