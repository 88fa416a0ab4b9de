// tools/src/main.rs
use base64::{engine::general_purpose::STANDARD as B64, Engine};

const SECRET_LEN: usize = 32;

fn main() {
    if sodiumoxide::init().is_err() {
        eprintln!("libsodium init failed");
        std::process::exit(1);
    }
    let secret = sodiumoxide::randombytes::randombytes(SECRET_LEN);
    println!("SECRET_KEY={}", B64.encode(secret));
}


/*
    generate a session secret for the backend and append it to .env

    cargo run -p secretgen --release >> .env


*/
