// src/common/cpf.rs

// Mantém apenas os dígitos: "123.456.789-09" -> "12345678909"
pub fn normalizar_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn cpf_tem_onze_digitos(cpf: &str) -> bool {
    normalizar_cpf(cpf).len() == 11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_pontuacao() {
        assert_eq!(normalizar_cpf("123.456.789-09"), "12345678909");
        assert_eq!(normalizar_cpf(" 123 456 789 09 "), "12345678909");
    }

    #[test]
    fn exige_onze_digitos() {
        assert!(cpf_tem_onze_digitos("123.456.789-09"));
        assert!(!cpf_tem_onze_digitos("000.000.000.0"));
        assert!(!cpf_tem_onze_digitos("abc"));
        assert!(!cpf_tem_onze_digitos("123456789012"));
    }
}
