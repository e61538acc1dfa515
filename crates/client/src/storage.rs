use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use rand::Rng;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Minimal key-value store behind the session layer. The flows only ever
/// need these three operations, which keeps them testable against
/// `MemoryStorage`.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-lifetime store. Backs the callback idempotency markers (which
/// must not outlive the app, like tab-scoped storage) and the test fakes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?
            .remove(key);
        Ok(())
    }
}

/// Durable store: a single AES-256-GCM encrypted JSON map in the platform
/// data directory, with the secret key kept next to it at mode 0600.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "anima", "anima")
            .ok_or_else(|| anyhow!("Could not determine project directories"))?;
        Self::at(proj_dirs.data_dir().to_path_buf())
    }

    /// Store rooted at an explicit directory, for non-default data
    /// locations.
    pub fn at(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn store_path(&self) -> PathBuf {
        self.root.join("store.enc")
    }

    fn secret_key_path(&self) -> PathBuf {
        self.root.join(".secret_key")
    }

    fn get_or_create_key(&self) -> Result<[u8; 32]> {
        let path = self.secret_key_path();

        if path.exists() {
            let key_bytes = fs::read(&path)?;
            if key_bytes.len() == 32 {
                let mut key = [0u8; 32];
                key.copy_from_slice(&key_bytes);
                return Ok(key);
            }
        }

        let mut key = [0u8; 32];
        rand::thread_rng().fill(&mut key);
        Self::write_secure_file(&path, &key)?;
        Ok(key)
    }

    fn write_secure_file(path: &PathBuf, bytes: &[u8]) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata()?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }
        Ok(())
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        use aes_gcm::{
            aead::{Aead, KeyInit},
            Aes256Gcm, Nonce,
        };

        let key = self.get_or_create_key()?;
        let cipher = Aes256Gcm::new(aes_gcm::aead::Key::<Aes256Gcm>::from_slice(&key));

        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| anyhow!("Encryption failed"))?;

        let mut result = nonce_bytes.to_vec();
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        use aes_gcm::{
            aead::{Aead, KeyInit},
            Aes256Gcm, Nonce,
        };

        if ciphertext.len() < 12 {
            return Err(anyhow!("Invalid ciphertext"));
        }

        let key = self.get_or_create_key()?;
        let cipher = Aes256Gcm::new(aes_gcm::aead::Key::<Aes256Gcm>::from_slice(&key));

        let nonce = Nonce::from_slice(&ciphertext[..12]);
        cipher
            .decrypt(nonce, &ciphertext[12..])
            .map_err(|_| anyhow!("Decryption failed"))
    }

    fn load_map(&self) -> Result<HashMap<String, String>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let encrypted = fs::read(&path)?;
        let decrypted = self.decrypt(&encrypted)?;
        Ok(serde_json::from_slice(&decrypted)?)
    }

    fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec(map)?;
        let encrypted = self.encrypt(&json)?;
        Self::write_secure_file(&self.store_path(), &encrypted)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.load_map() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                tracing::warn!("Failed to read storage: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }
}
