//! Random codes handed out to affiliates.

use rand::Rng;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LINK_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const LINK_CODE_LEN: usize = 8;
pub const REFERRAL_SUFFIX_LEN: usize = 4;
const REFERRAL_BASE_MAX: usize = 6;

/// Upper-cased first name with accents folded and anything outside A-Z dropped
pub fn referral_base(name: &str) -> String {
    name.split(' ')
        .next()
        .unwrap_or_default()
        .to_uppercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_uppercase())
        .take(REFERRAL_BASE_MAX)
        .collect()
}

pub fn referral_code<R: Rng + ?Sized>(base: &str, rng: &mut R) -> String {
    format!("{}{}", base, random_string(rng, BASE36, REFERRAL_SUFFIX_LEN))
}

pub fn link_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_string(rng, LINK_ALPHABET, LINK_CODE_LEN)
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        'Ý' => 'Y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn referral_base_folds_accents_and_truncates() {
        assert_eq!(referral_base("João Silva"), "JOAO");
        assert_eq!(referral_base("maximiliano souza"), "MAXIMI");
        assert_eq!(referral_base("Ângela-Maria"), "ANGELA");
        assert_eq!(referral_base("Zé"), "ZE");
        assert_eq!(referral_base("123 Numbers"), "");
    }

    #[test]
    fn referral_code_appends_base36_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = referral_code("JOAO", &mut rng);
        assert_eq!(code.len(), 8);
        assert!(code.starts_with("JOAO"));
        assert!(code[4..].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn link_codes_are_eight_upper_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let code = link_code(&mut rng);
            assert_eq!(code.len(), LINK_CODE_LEN);
            assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }
}
