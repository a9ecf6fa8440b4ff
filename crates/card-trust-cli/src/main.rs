//! card-trust CLI — `cardv` command.
//!
//! Provides a command-line interface for creating and signing identity
//! cards, inspecting them, and verifying them against trust policy files.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use card_trust::card::{parse_card, Card, CardSigner, RawCardContent, RawSignedModel};
use card_trust::config::{CredentialConfig, PolicyConfig, PolicyFile};
use card_trust::verify::{explain_card, verify_card, CardVerification, WhitelistOutcome};
use card_trust::{Ed25519CardCrypto, Ed25519KeyPair, SERVICE_SIGNER};

/// Exit code used when a card parses but is not trusted.
const EXIT_NOT_VERIFIED: i32 = 2;

const KEY_FILE_VERSION: u32 = 1;

// ── Key files ─────────────────────────────────────────────────────────────────

/// Ed25519 key pair stored as JSON.
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    version: u32,
    /// Base64 signing key (32 bytes).
    secret_key: String,
    /// Base64 raw public key (32 bytes).
    public_key: String,
}

fn b64_encode(bytes: &[u8]) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes)
}

fn b64_decode(value: &str) -> Result<Vec<u8>> {
    base64::Engine::decode(&base64::engine::general_purpose::STANDARD, value.trim())
        .map_err(|e| anyhow!("invalid base64: {e}"))
}

fn load_key_pair(path: &Path) -> Result<Ed25519KeyPair> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file {}", path.display()))?;
    let file: KeyFile = serde_json::from_str(&json).context("malformed key file")?;
    if file.version != KEY_FILE_VERSION {
        bail!("unsupported key file version {}", file.version);
    }
    let secret: [u8; 32] = b64_decode(&file.secret_key)?
        .try_into()
        .map_err(|_| anyhow!("secret key must be 32 bytes"))?;
    Ok(Ed25519KeyPair::from_signing_key_bytes(&secret))
}

fn load_public_key(path: &Path) -> Result<Vec<u8>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read key file {}", path.display()))?;
    let file: KeyFile = serde_json::from_str(&json).context("malformed key file")?;
    b64_decode(&file.public_key)
}

// ── Card file helpers ─────────────────────────────────────────────────────────

/// Read a card file holding either JSON or base64-encoded JSON.
fn read_raw_card(path: &Path) -> Result<RawSignedModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read card file {}", path.display()))?;
    let raw = if text.trim_start().starts_with('{') {
        RawSignedModel::from_json_str(&text)?
    } else {
        RawSignedModel::from_base64(&text)?
    };
    Ok(raw)
}

fn write_raw_card(raw: &RawSignedModel, output: Option<&Path>, base64: bool) -> Result<()> {
    let text = if base64 {
        raw.to_base64()?
    } else {
        raw.to_json_string()?
    };
    match output {
        Some(path) => {
            std::fs::write(path, text.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote card to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn secs_to_datetime(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// card-trust CLI — create, sign, inspect and verify identity cards.
#[derive(Parser, Debug)]
#[command(
    name = "cardv",
    about = "card-trust CLI",
    version,
    long_about = "cardv — card-trust CLI\n\nCreate and sign identity cards, inspect them, and verify them\nagainst trust policies with self, service and whitelist checks."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 key file
    Keygen {
        /// Output key file path
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Create a new self-signed card
    Create {
        /// Identity the card asserts
        #[arg(long)]
        identity: String,

        /// Subject key file
        #[arg(long)]
        key: PathBuf,

        /// ID of the card this one replaces
        #[arg(long)]
        previous: Option<String>,

        /// Output card file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write base64 instead of JSON
        #[arg(long)]
        base64: bool,
    },

    /// Add a signature to an existing card
    Sign {
        /// Card file (JSON or base64)
        card: PathBuf,

        /// Signer key file
        #[arg(long)]
        key: PathBuf,

        /// Signer identifier
        #[arg(long, default_value = SERVICE_SIGNER)]
        signer: String,

        /// Extra data the signer commits to
        #[arg(long)]
        extra: Option<String>,

        /// Output card file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write base64 instead of JSON
        #[arg(long)]
        base64: bool,
    },

    /// Display card contents and signers
    Inspect {
        /// Card file (JSON or base64)
        card: PathBuf,
    },

    /// Verify a card against a policy file
    Verify {
        /// Card file (JSON or base64)
        card: PathBuf,

        /// Policy file
        #[arg(long)]
        policy: PathBuf,

        /// Show which checks passed or failed
        #[arg(long)]
        explain: bool,
    },

    /// Manage policy files
    Policy {
        #[command(subcommand)]
        subcommand: PolicyCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PolicyCommands {
    /// Create a policy file anchored on a service key
    Init {
        /// Service key file
        #[arg(long)]
        service_key: PathBuf,

        /// Do not require the self signature
        #[arg(long)]
        no_self: bool,

        /// Do not require the service signature
        #[arg(long)]
        no_service: bool,

        /// Output policy file
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Add a trusted signer to a whitelist
    Whitelist {
        /// Policy file to update
        policy: PathBuf,

        /// Signer identifier
        #[arg(long)]
        signer: String,

        /// Signer key file
        #[arg(long)]
        key: PathBuf,

        /// Add to an existing whitelist (by index) instead of a new one
        #[arg(long)]
        into: Option<usize>,
    },

    /// Validate and display a policy file
    Show {
        /// Policy file
        policy: PathBuf,
    },
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Keygen { output } => cmd_keygen(&output, verbose),
        Commands::Create {
            identity,
            key,
            previous,
            output,
            base64,
        } => cmd_create(
            &identity,
            &key,
            previous.as_deref(),
            output.as_deref(),
            base64,
        ),
        Commands::Sign {
            card,
            key,
            signer,
            extra,
            output,
            base64,
        } => cmd_sign(
            &card,
            &key,
            &signer,
            extra.as_deref(),
            output.as_deref(),
            base64,
        ),
        Commands::Inspect { card } => cmd_inspect(&card, verbose),
        Commands::Verify {
            card,
            policy,
            explain,
        } => cmd_verify(&card, &policy, explain),
        Commands::Policy { subcommand } => match subcommand {
            PolicyCommands::Init {
                service_key,
                no_self,
                no_service,
                output,
            } => cmd_policy_init(&service_key, no_self, no_service, &output),
            PolicyCommands::Whitelist {
                policy,
                signer,
                key,
                into,
            } => cmd_policy_whitelist(&policy, &signer, &key, into),
            PolicyCommands::Show { policy } => cmd_policy_show(&policy),
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NOT_VERIFIED),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

// ── Command implementations ───────────────────────────────────────────────────
//
// Every command returns `Ok(true)` on success. `verify` returns `Ok(false)`
// for a card that parsed but was not trusted.

/// `cardv keygen --output FILE`
fn cmd_keygen(output: &Path, verbose: bool) -> Result<bool> {
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    let kp = Ed25519KeyPair::generate();
    let file = KeyFile {
        version: KEY_FILE_VERSION,
        secret_key: b64_encode(&kp.signing_key_bytes()),
        public_key: b64_encode(&kp.public_key_bytes()),
    };
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(output, json.as_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Public key: {}", file.public_key);
    if verbose {
        println!("Key file:   {}", output.display());
    }
    Ok(true)
}

/// `cardv create --identity ID --key FILE`
fn cmd_create(
    identity: &str,
    key: &Path,
    previous: Option<&str>,
    output: Option<&Path>,
    base64: bool,
) -> Result<bool> {
    let kp = load_key_pair(key)?;
    let mut content = RawCardContent::new(identity, &kp.public_key_bytes());
    if let Some(previous) = previous {
        content = content.with_previous_card_id(previous);
    }

    let mut raw = RawSignedModel::from_content(&content)?;
    CardSigner::new(kp.signing_key()).self_sign(&mut raw, None)?;

    write_raw_card(&raw, output, base64)?;
    Ok(true)
}

/// `cardv sign CARD --key FILE --signer ID [--extra TEXT]`
fn cmd_sign(
    card: &Path,
    key: &Path,
    signer: &str,
    extra: Option<&str>,
    output: Option<&Path>,
    base64: bool,
) -> Result<bool> {
    let mut raw = read_raw_card(card)?;
    let kp = load_key_pair(key)?;
    CardSigner::new(kp.signing_key())
        .sign(&mut raw, signer, extra.map(str::as_bytes))
        .with_context(|| format!("failed to sign as '{signer}'"))?;

    write_raw_card(&raw, output, base64)?;
    Ok(true)
}

/// `cardv inspect CARD`
fn cmd_inspect(card: &Path, verbose: bool) -> Result<bool> {
    let card = parse_card(&read_raw_card(card)?)?;
    print_card(&card, verbose);
    Ok(true)
}

fn print_card(card: &Card, verbose: bool) {
    println!("Card: {}", card.id);
    println!("  Identity:   {}", card.identity);
    println!("  Version:    {}", card.version);
    println!("  Created:    {}", secs_to_datetime(card.created_at));
    if let Some(ref previous) = card.previous_card_id {
        println!("  Replaces:   {previous}");
    }
    if verbose {
        println!("  Public key: {}", b64_encode(&card.public_key));
    }
    println!("  Signatures ({}):", card.signatures.len());
    for sig in &card.signatures {
        match sig.snapshot {
            Some(ref extra) => println!("    - {} (+{} bytes extra)", sig.signer, extra.len()),
            None => println!("    - {}", sig.signer),
        }
    }
}

/// `cardv verify CARD --policy FILE [--explain]`
fn cmd_verify(card: &Path, policy: &Path, explain: bool) -> Result<bool> {
    let file = PolicyFile::load(policy)
        .with_context(|| format!("failed to load policy {}", policy.display()))?;
    let policy = file
        .policy
        .build_policy(Ed25519CardCrypto)
        .context("policy is unusable")?;
    let card = parse_card(&read_raw_card(card)?)?;

    let verified = verify_card(&card, &policy);

    println!("Card: {}", card.id);
    println!("  Identity: {}", card.identity);
    if explain {
        print_explanation(&explain_card(&card, &policy));
    }
    println!();
    println!("Result: {}", if verified { "VERIFIED" } else { "NOT VERIFIED" });

    Ok(verified)
}

fn print_explanation(verification: &CardVerification) {
    println!();
    println!(
        "Checks ({}):",
        card_trust::time::secs_to_rfc3339(verification.verified_at)
    );
    println!("  Self signature:    {}", verification.self_signature.as_str());
    println!(
        "  Service signature: {}",
        verification.service_signature.as_str()
    );
    for (i, outcome) in verification.whitelists.iter().enumerate() {
        let line = match outcome {
            WhitelistOutcome::NoMatchingSigner => "no trusted signer on card".to_string(),
            WhitelistOutcome::KeyImportFailed { signer } => format!("{signer}: unusable key"),
            WhitelistOutcome::InvalidSignature { signer } => format!("{signer}: invalid"),
            WhitelistOutcome::Verified { signer } => format!("{signer}: valid"),
        };
        println!("  Whitelist [{i}]:     {line}");
    }
}

/// `cardv policy init --service-key FILE --output FILE`
fn cmd_policy_init(service_key: &Path, no_self: bool, no_service: bool, output: &Path) -> Result<bool> {
    let key = load_public_key(service_key)?;
    let mut config = PolicyConfig::new(&key);
    config.verify_self_signature = !no_self;
    config.verify_service_signature = !no_service;

    config
        .build_policy(Ed25519CardCrypto)
        .context("service key is unusable")?;
    PolicyFile::new(config).save(output)?;

    println!("Policy written to {}", output.display());
    Ok(true)
}

/// `cardv policy whitelist POLICY --signer ID --key FILE [--into N]`
fn cmd_policy_whitelist(policy: &Path, signer: &str, key: &Path, into: Option<usize>) -> Result<bool> {
    let mut file = PolicyFile::load(policy)
        .with_context(|| format!("failed to load policy {}", policy.display()))?;
    let credential = CredentialConfig {
        signer: signer.to_string(),
        public_key: b64_encode(&load_public_key(key)?),
    };

    match into {
        Some(index) => file
            .policy
            .whitelists
            .get_mut(index)
            .ok_or_else(|| anyhow!("policy has no whitelist {index}"))?
            .push(credential),
        None => file.policy.whitelists.push(vec![credential]),
    }

    file.policy
        .build_policy(Ed25519CardCrypto)
        .context("updated policy is unusable")?;
    file.save(policy)?;

    println!(
        "Policy now has {} whitelist(s)",
        file.policy.whitelists.len()
    );
    Ok(true)
}

/// `cardv policy show POLICY`
fn cmd_policy_show(policy: &Path) -> Result<bool> {
    let file = PolicyFile::load(policy)
        .with_context(|| format!("failed to load policy {}", policy.display()))?;
    file.policy
        .build_policy(Ed25519CardCrypto)
        .context("policy is unusable")?;

    let config = &file.policy;
    println!("Policy (version {}):", file.version);
    println!(
        "  Self signature:    {} (signer '{}')",
        if config.verify_self_signature { "required" } else { "not required" },
        config.self_signer
    );
    println!(
        "  Service signature: {} (signer '{}')",
        if config.verify_service_signature { "required" } else { "not required" },
        config.service_signer
    );
    println!("  Service key:       {}", config.service_public_key);
    println!("  Whitelists ({}):", config.whitelists.len());
    for (i, whitelist) in config.whitelists.iter().enumerate() {
        let signers: Vec<&str> = whitelist.iter().map(|c| c.signer.as_str()).collect();
        println!("    [{i}] {}", signers.join(", "));
    }
    Ok(true)
}
