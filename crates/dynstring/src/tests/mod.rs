mod alloc_failure;
mod capacity;
mod utils;
