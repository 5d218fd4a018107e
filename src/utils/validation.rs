//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación y normalización
//! de patentes, RUT y teléfonos.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Largo máximo de una patente normalizada
pub const LARGO_MAX_PATENTE: usize = 8;

lazy_static! {
    static ref PATENTE_RE: Regex = Regex::new(r"^[A-Z0-9]{5,8}$").unwrap();
}

/// Normalizar una patente: mayúsculas, solo alfanuméricos, largo acotado.
///
/// La normalización es idempotente: normalizar una patente ya normalizada
/// devuelve el mismo valor.
pub fn normalizar_patente(valor: &str) -> String {
    valor
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(LARGO_MAX_PATENTE)
        .collect()
}

/// Validar el formato de una patente ya normalizada
pub fn validar_patente(valor: &str) -> Result<(), ValidationError> {
    if !PATENTE_RE.is_match(valor) {
        let mut error = ValidationError::new("patente");
        error.add_param("value".into(), &valor.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un RUT chileno con dígito verificador (módulo 11)
pub fn validar_rut(valor: &str) -> Result<(), ValidationError> {
    let limpio: String = valor
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let invalido = || {
        let mut error = ValidationError::new("rut");
        error.add_param("value".into(), &valor.to_string());
        error
    };

    if limpio.len() < 8 || limpio.len() > 9 {
        return Err(invalido());
    }

    let (cuerpo, dv) = limpio.split_at(limpio.len() - 1);
    if !cuerpo.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalido());
    }

    let mut suma: u32 = 0;
    let mut factor = 2;
    for c in cuerpo.chars().rev() {
        suma += c.to_digit(10).unwrap() * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }

    let resto = 11 - (suma % 11);
    let esperado = match resto {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap(),
    };

    if dv.chars().next() != Some(esperado) {
        return Err(invalido());
    }
    Ok(())
}

/// Llevar un teléfono chileno a su forma canónica `+56 9 XXXXXXXX`.
///
/// Acepta números con o sin prefijo de país. Si el valor no se reconoce
/// como número móvil chileno se devuelve tal cual, sin error: la
/// canonicalización es cosmética, no un rechazo.
pub fn canonicalizar_telefono(valor: &str) -> String {
    let digitos: String = valor.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = if let Some(resto) = digitos.strip_prefix("56") {
        resto
    } else {
        digitos.as_str()
    };

    if local.len() == 9 && local.starts_with('9') {
        format!("+56 9 {}", &local[1..])
    } else {
        valor.trim().to_string()
    }
}

/// Validar que un string no esté vacío
pub fn validar_no_vacio(valor: &str) -> Result<(), ValidationError> {
    if valor.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &valor.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizar_patente() {
        assert_eq!(normalizar_patente("ab-1234"), "AB1234");
        assert_eq!(normalizar_patente("  bb · cj 12 "), "BBCJ12");
        assert_eq!(normalizar_patente("abcd1234extra"), "ABCD1234");
        assert_eq!(normalizar_patente(""), "");
    }

    #[test]
    fn test_normalizar_patente_es_idempotente() {
        for patente in ["ab-1234", "BBCJ12", "x", "KJFS-829304", ""] {
            let una = normalizar_patente(patente);
            assert_eq!(normalizar_patente(&una), una);
        }
    }

    #[test]
    fn test_normalizar_patente_acota_largo() {
        let larga = normalizar_patente(&"A1".repeat(30));
        assert!(larga.len() <= LARGO_MAX_PATENTE);
        assert!(larga.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_validar_patente() {
        assert!(validar_patente("AB1234").is_ok());
        assert!(validar_patente("BBCJ12").is_ok());
        assert!(validar_patente("ab1234").is_err());
        assert!(validar_patente("A1").is_err());
        assert!(validar_patente("").is_err());
    }

    #[test]
    fn test_validar_rut() {
        assert!(validar_rut("11.111.111-1").is_ok());
        assert!(validar_rut("11111111-1").is_ok());
        assert!(validar_rut("7775777-K").is_err());
        assert!(validar_rut("11.111.111-2").is_err());
        assert!(validar_rut("123").is_err());
    }

    #[test]
    fn test_canonicalizar_telefono() {
        assert_eq!(canonicalizar_telefono("912345678"), "+56 9 12345678");
        assert_eq!(canonicalizar_telefono("+56912345678"), "+56 9 12345678");
        assert_eq!(canonicalizar_telefono("56 9 1234 5678"), "+56 9 12345678");
        // Números no reconocidos se devuelven sin tocar
        assert_eq!(canonicalizar_telefono("223456789"), "223456789");
    }

    #[test]
    fn test_validar_no_vacio() {
        assert!(validar_no_vacio("hola").is_ok());
        assert!(validar_no_vacio("   ").is_err());
    }
}
