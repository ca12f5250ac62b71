use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("cannot initialize particles: the map contains no ways")]
    NoWays,
}
