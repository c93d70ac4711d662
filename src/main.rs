use std::{env, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hex::ToHex;
use log::{debug, info, warn};
use serde::Deserialize;
use x25519_kex::{
    compute_shared_secret_with, derive_public_key, util::hex_to_bytes, Validation,
};

/// X25519 key agreement over Curve25519 (RFC 7748).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Alternative config file location, default to ~/.config/x25519-kex/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the public key of a hex-encoded 32-byte secret.
    Public {
        /// Secret key, falls back to `secret` in the config file.
        secret: Option<String>,
    },
    /// Compute the shared secret with a peer's hex-encoded public key.
    Shared {
        /// Peer public key.
        peer: String,
        /// Secret key, falls back to `secret` in the config file.
        secret: Option<String>,
        /// Reject non-canonical and low-order peer keys and an all-zero result.
        #[arg(long)]
        strict: bool,
    },
    /// Print the RFC 7748 section 6.1 test vectors.
    Vectors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub secret: Option<String>,
    pub strict: bool,
}

const ALICE_SECRET: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
const BOB_SECRET: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let path = match path {
        Some(path) => path,
        None => {
            let home_path = env::var("HOME").unwrap_or("/".to_owned());
            PathBuf::from(home_path).join(".config/x25519-kex/config.toml")
        }
    };
    if !explicit && !path.is_file() {
        debug!("no config file at {}", path.display());
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

fn secret_bytes(arg: Option<String>, config: &Config) -> Result<Vec<u8>> {
    let text = match arg.or_else(|| config.secret.clone()) {
        Some(text) => text,
        None => bail!("no secret key given and none set in the config file"),
    };
    hex_to_bytes(&text).context("decoding secret key")
}

fn run_vectors() -> Result<bool> {
    let alice = hex_to_bytes(ALICE_SECRET)?;
    let bob = hex_to_bytes(BOB_SECRET)?;
    let alice_public = derive_public_key(&alice)?;
    let bob_public = derive_public_key(&bob)?;
    let alice_shared = compute_shared_secret_with(&alice, &bob_public, Validation::Permissive)?;
    let bob_shared = compute_shared_secret_with(&bob, &alice_public, Validation::Permissive)?;

    let mut ok = true;
    for (label, got, expected) in [
        ("alice public", alice_public, ALICE_PUBLIC),
        ("bob public  ", bob_public, BOB_PUBLIC),
        ("alice shared", alice_shared, SHARED),
        ("bob shared  ", bob_shared, SHARED),
    ] {
        let got: String = got.encode_hex();
        let status = if got == expected { "ok" } else { "MISMATCH" };
        ok &= got == expected;
        println!("{}: {} {}", label, got, status);
    }
    Ok(ok)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config)?;

    match args.command {
        Command::Public { secret } => {
            let secret = secret_bytes(secret, &config)?;
            let public = derive_public_key(&secret)?;
            println!("{}", public.encode_hex::<String>());
        }
        Command::Shared {
            peer,
            secret,
            strict,
        } => {
            let secret = secret_bytes(secret, &config)?;
            let peer = hex_to_bytes(&peer).context("decoding peer public key")?;
            let validation = if strict || config.strict {
                Validation::Strict
            } else {
                Validation::Permissive
            };
            let shared = compute_shared_secret_with(&secret, &peer, validation)?;
            if shared.iter().all(|&b| b == 0) {
                warn!("shared secret is all-zero and must not be used as key material");
            }
            println!("{}", shared.encode_hex::<String>());
        }
        Command::Vectors => {
            if !run_vectors()? {
                bail!("RFC 7748 test vectors do not match");
            }
        }
    }
    Ok(())
}
