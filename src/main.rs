// =========================================================
// Démonstration: Cryptosystème de Paillier
// Génération de clés, chiffrement, addition homomorphique
// =========================================================

use paillier_engine::{
    p_keygen_with_config, p_encrypt_with_config, p_decrypt, p_add, p_mul_plain,
    CryptoError, EngineConfig, KeyPair, KeyRegistry, RegistryError,
};

use num_bigint::BigUint;
use std::thread;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError, RegistryError et io::Error pour propager
// toutes les erreurs via ? sans conversion manuelle
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Registry(RegistryError),
    Io(std::io::Error),
    Worker,
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e)   => write!(f, "Erreur cryptographique : {}", e),
            AppError::Registry(e) => write!(f, "Erreur de registre : {}", e),
            AppError::Io(e)       => write!(f, "Erreur I/O : {}", e),
            AppError::Worker      => write!(f, "Un thread de chiffrement a paniqué"),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self { AppError::Registry(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
//
// Usage : paillier_demo [config.json]
// ─────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("\n[ERREUR] {}\n", e);
        std::process::exit(1);
    }
}

fn charger_config() -> Result<EngineConfig, AppError> {
    let base = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "chargement de la configuration");
            EngineConfig::load_json(&path)?
        }
        None => EngineConfig::default(),
    };
    Ok(base.with_env_overrides()?)
}

fn run() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    Cryptosystème de Paillier — Démonstration");
    println!("==============================================");

    let config = charger_config()?;

    let t       = Instant::now();
    let keypair = p_keygen_with_config(&config)?;
    let d_keygen = t.elapsed();
    afficher_cles(&keypair);

    let registry = KeyRegistry::new();
    registry.set_keypair(keypair)?;
    let pk = registry.public_key()?;

    // Messages clairs
    let m1 = BigUint::from(2u32);
    let m2 = BigUint::from(11u32);
    let m3 = BigUint::from(5u32);
    let m4 = BigUint::from(13u32);

    let t   = Instant::now();
    let em1 = p_encrypt_with_config(&m1, &pk, &config)?;
    let em2 = p_encrypt_with_config(&m2, &pk, &config)?;
    let em3 = p_encrypt_with_config(&m3, &pk, &config)?;
    let em4 = p_encrypt_with_config(&m4, &pk, &config)?;
    let d_enc = t.elapsed();

    println!("\n--- CHIFFRÉS ---");
    for (m, c) in [(&m1, &em1), (&m2, &em2), (&m3, &em3), (&m4, &em4)] {
        println!("  E({}) = {}", m, c);
    }

    let t = Instant::now();
    let d_m2 = registry.with_secret_key(|sk| p_decrypt(&em2, sk))??;
    let d_m3 = registry.with_secret_key(|sk| p_decrypt(&em3, sk))??;
    let d_dec = t.elapsed();
    println!("\n  D(E({})) = {}", m2, d_m2);
    println!("  D(E({})) = {}", m3, d_m3);

    // Addition homomorphique : D(E(m1)·E(m3) mod n²) = (m1 + m3) mod n
    println!("\n--- ADDITION HOMOMORPHIQUE ---");
    let t        = Instant::now();
    let em1_em3  = p_add(&em1, &em3, &pk)?;
    let d_add    = t.elapsed();
    let somme    = registry.with_secret_key(|sk| p_decrypt(&em1_em3, sk))??;
    let attendue = (&m1 + &m3) % pk.n();
    println!("  somme claire     : {}", attendue);
    println!("  somme déchiffrée : {}", somme);
    verdict(somme == attendue);

    let em2_em3 = p_add(&em2, &em3, &pk)?;
    let somme   = registry.with_secret_key(|sk| p_decrypt(&em2_em3, sk))??;
    println!("  D(E({})·E({})) = {}", m2, m3, somme);
    verdict(somme == (&m2 + &m3) % pk.n());

    // Multiplication par un scalaire : D(E(m2)^m4 mod n²) = (m2 · m4) mod n
    println!("\n--- MULTIPLICATION PAR UN SCALAIRE ---");
    let em2_m4   = p_mul_plain(&em2, &m4, &pk)?;
    let produit  = registry.with_secret_key(|sk| p_decrypt(&em2_m4, sk))??;
    let attendu  = (&m2 * &m4) % pk.n();
    println!("  produit clair     : {}", attendu);
    println!("  produit déchiffré : {}", produit);
    verdict(produit == attendu);

    // Chiffrements concurrents sur la même clé publique
    println!("\n--- CHIFFREMENTS CONCURRENTS ---");
    let t = Instant::now();
    let handles: Vec<_> = (0..4u32).map(|i| {
        let reg = registry.clone();
        let cfg = config.clone();
        thread::spawn(move || -> Result<bool, AppError> {
            let pk = reg.public_key()?;
            let m  = BigUint::from(1_000u32 + i);
            let c  = p_encrypt_with_config(&m, &pk, &cfg)?;
            Ok(reg.with_secret_key(|sk| p_decrypt(&c, sk))?? == m)
        })
    }).collect();

    let mut ok = true;
    for h in handles {
        ok &= h.join().map_err(|_| AppError::Worker)??;
    }
    let d_threads = t.elapsed();
    verdict(ok);

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — Paillier");
    println!("==============================================");
    println!("  Génération des clés    : {:.3?}", d_keygen);
    println!("  Chiffrement (x4)       : {:.3?}", d_enc);
    println!("  Déchiffrement (x2)     : {:.3?}", d_dec);
    println!("  Addition homomorphique : {:.3?}", d_add);
    println!("  Threads (x4)           : {:.3?}", d_threads);
    println!("==============================================");

    registry.clear_keypair()?;
    Ok(())
}

fn afficher_cles(kp: &KeyPair) {
    println!("--- CLÉ PUBLIQUE ---");
    println!("  |n|         = {} bits", kp.public_key.n().bits());
    println!("  g           = n + 1");
    println!("  |n_squared| = {} bits", kp.public_key.n_squared().bits());
    println!("--- CLÉ SECRÈTE ---");
    println!("  |lambda|    = {} bits", kp.secret_key.lambda().bits());
    println!("  |mu|        = {} bits", kp.secret_key.mu().bits());
}

fn verdict(ok: bool) {
    if ok {
        println!("  Propriété homomorphe vérifiée");
    } else {
        println!("  Erreur : résultat déchiffré inattendu !");
    }
}
