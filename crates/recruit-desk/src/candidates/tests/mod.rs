mod common;
mod export;
mod routing;
