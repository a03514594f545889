// ABOUTME: Command module aggregator for the railyard CLI.
// ABOUTME: Re-exports the promote command handler.

mod promote;

pub use promote::promote;
