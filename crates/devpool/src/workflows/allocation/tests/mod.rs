mod common;
mod proposal;
