use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of the root liveness endpoint.
#[derive(Serialize, Debug)]
pub struct Liveness {
    pub message: &'static str,
}

impl Liveness {
    pub fn up() -> Self {
        Self { message: "Up and running" }
    }
}
