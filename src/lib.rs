pub mod api;
pub mod compare;
pub mod normalization;
pub mod sources;
pub mod tracing;

pub mod util {
    pub mod env;
}

#[cfg(test)]
pub(crate) mod test_support;
