use tokio::net::TcpListener;

/// Start of a block of `len` ports, picked at random to keep parallel runs apart.
pub fn random_base(len: u16) -> u16 {
    rand::random_range(20_000..60_000 - len)
}

pub async fn hold(port: u16) -> TcpListener {
    TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("test port already taken")
}

/// A port the OS just handed out and took back.
pub async fn ephemeral_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
