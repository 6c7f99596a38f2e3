use crate::config::{AppConfig, Argon2Config};
use crate::errors::AcademyError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn argon2_from(config: &Argon2Config) -> Result<Argon2<'static>, AcademyError> {
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| AcademyError::validation(format!("Argon2 参数错误: {e}")))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码（argon2id，参数取自配置）
pub fn hash_password(password: &str) -> Result<String, AcademyError> {
    hash_password_with(password, &AppConfig::get().argon2)
}

pub fn hash_password_with(password: &str, config: &Argon2Config) -> Result<String, AcademyError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_from(config)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AcademyError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串本身读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("Sprint2026", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Sprint2026", &hash));
        assert!(!verify_password("sprint2026", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_invalid_params() {
        let bad = Argon2Config {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 1,
        };
        assert!(hash_password_with("Sprint2026", &bad).is_err());
    }
}
