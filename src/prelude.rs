pub use crate::{
    collections::*,
    config::*,
    error::*,
    hash::*,
    values::*,
};
