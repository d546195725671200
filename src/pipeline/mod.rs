pub mod adapters;
pub mod broadcast;
pub mod cancel;
pub mod chain;
pub mod fan_in;
pub mod pipe;
pub mod runtime;
pub mod shared;
pub mod take;
