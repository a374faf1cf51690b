//! Legislator record preparation
//!
//! Normalizes raw records into the categorical node features: occupation
//! and education collapse onto canonical labels, the state gives a region,
//! birth date and election year give an age group, and ethnicity gaps are
//! filled from the same person's other mandates.

use crate::records::LegislatorRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// One legislator mandate with its final feature map
#[derive(Debug, Clone)]
pub struct PreparedLegislator {
    pub id: u64,
    pub legislature: u32,
    pub election_year: i32,
    pub features: BTreeMap<String, String>,
}

/// Collapse a raw occupation onto its canonical label. Missing and
/// unmapped occupations land in "other".
fn classify_occupation(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "other".to_string();
    };
    let label = match raw.to_uppercase().as_str() {
        "DEPUTADO"
        | "SENADOR"
        | "VEREADOR"
        | "SENADOR, DEPUTADO E VEREADOR"
        | "PRESIDENTE DA REPUBLICA, MINISTRO DE ESTADO, GOVERNADOR E PREFEITO"
        | "OCUPANTE DE CARGO EM COMISSÃO" => "politician",
        "ENGENHEIRO" | "ARQUITETO" => "engineer/architect",
        "SERVIDOR PUBLICO FEDERAL"
        | "SERVIDOR PÚBLICO FEDERAL"
        | "SERVIDOR PUBLICO ESTADUAL"
        | "SERVIDOR PÚBLICO ESTADUAL"
        | "SERVIDOR PUBLICO MUNICIPAL"
        | "SERVIDOR PÚBLICO MUNICIPAL"
        | "SERVIDOR PUBLICO CIVIL APOSENTADO"
        | "SERVIDOR PÚBLICO CIVIL APOSENTADO"
        | "TABELIÃO"
        | "FISCAL" => "public servant",
        "MEMBRO DAS FORÇAS ARMADAS" | "MILITAR REFORMADO" | "BOMBEIRO MILITAR"
        | "POLICIAL MILITAR" | "POLICIAL CIVIL" => "military",
        "PROFESSOR DE ENSINO SUPERIOR" => "university professor",
        "PROFESSOR E INSTRUTOR DE FORMAÇÃO PROFISSIONAL"
        | "PROFESSOR E INSTRUTOR DE FORMACAO PROFISSIONAL"
        | "PROFESSOR DE ENSINO DE PRIMEIRO E SEGUNDO GRAUS"
        | "PROFESSOR DE ENSINO FUNDAMENTAL"
        | "PROFESSOR DE ENSINO MÉDIO"
        | "PEDAGOGO" => "teacher",
        "ESTUDANTE, BOLSISTA, ESTAGIÁRIO E ASSEMELHADOS"
        | "ESTUDANTE, BOLSISTA, ESTAGIARIO E ASSEMELHADOS"
        | "ESTUDANTE,BOLSISTA, ESTAGIARIO E ASSEMELHADOS" => "student",
        "MOTORISTA PARTICULAR"
        | "MOTORISTA DE VEÍCULOS DE TRANSPORTE COLETIVO DE PASSAGEIROS" => "driver",
        "OPERADOR DE EQUIPAMENTO DE RÁDIO, TELEVISÃO, SOM E CINEMA"
        | "COMUNICÓLOGO"
        | "COMUNICOLOGO"
        | "LOCUTOR E COMENTARISTA DE RÁDIO E TELEVISÃO E RADIALISTA"
        | "LOCUTOR E COMENTARISTA DE RADIO E TELEVISÃO E RADIALISTA"
        | "LOCUTOR E COMENTARISTA DE RADIO E TELEVISAO E RADIALISTA"
        | "FOTÓGRAFO E ASSEMELHADOS"
        | "TRABALHADOR DE ARTES GRAFICAS"
        | "TRABALHADOR DE ARTES GRÁFICAS" => "media worker",
        "JORNALISTA E REDATOR" => "journalist",
        "PUBLICITÁRIO" => "publicist",
        "ATOR E DIRETOR DE ESPETÁCULOS PÚBLICOS" | "MÚSICO" | "CANTOR E COMPOSITOR" => {
            "actor/musician"
        }
        "PECUARISTA" | "AGRICULTOR" | "PRODUTOR AGROPECUARIO" | "PRODUTOR AGROPECUÁRIO"
        | "PESCADOR" => "farmer",
        "TECNICO CONTABILIDADE, ESTATISTICA, ECONOMIA DOMESTICA E ADMINISTRACAO"
        | "TÉCNICO CONTABILIDADE, ESTATÍSTICA, ECONOMIA DOMÉSTICA E ADMINISTRAÇÃO"
        | "CONTADOR" => "accountant",
        "VENDEDOR DE COMÉRCIO VAREJISTA E ATACADISTA" | "COMERCIANTE"
        | "REPRESENTANTE COMERCIAL" | "COMERCIÁRIO" => "salesman",
        "INDUSTRIAL"
        | "OPERADOR DE APARELHOS DE PRODUÇÃO INDUSTRIAL"
        | "FERROVIÁRIO"
        | "FERROVIARIO"
        | "TRABALHADOR METALÚRGICO E SIDERÚRGICO"
        | "TRABALHADOR METALURGICO E SIDERURGICO"
        | "TECNICO DE ELETRICIDADE, ELETRONICA E TELECOMUNICACOES"
        | "ENCANADOR,SOLDADOR,CHAPEADOR,CALDEIREIRO,MONTADOR DE ESTRUTURA METALIC"
        | "TORNEIRO MECÂNICO"
        | "TÉCNICO EM EDIFICAÇÕES" => "blue collar",
        "VETERINÁRIO" | "VETERINARIO" | "ZOOTECNISTA" | "AGRONOMO" | "AGRÔNOMO"
        | "TÉCNICO EM AGRONOMIA E AGRIMENSURA"
        | "OPERADOR DE IMPLEMENTO DE AGRICULTURA, PECUARIA E EXPLORACAO FLORESTAL" => {
            "veterinarian/agronomist"
        }
        "ODONTOLOGO" | "ODONTÓLOGO" | "MÉDICO" | "MEDICO" => "dentist/medic",
        "ADVOGADO" | "MAGISTRADO" | "MEMBRO DO MINISTERIO PUBLICO"
        | "MEMBRO DO MINISTÉRIO PÚBLICO" => "judge/lawyer/prosecutor",
        "BIOMÉDICO" | "BIOLOGO E BIOMEDICO" | "BIÓLOGO" => "biologist",
        "PSICOLOGO" | "PSICÓLOGO" | "ASSISTENTE SOCIAL" | "ENFERMEIRO"
        | "FISIOTERAPEUTA E TERAPEUTA OCUPACIONAL" | "FARMACEUTICO" | "FARMACÊUTICO" => {
            "health professional"
        }
        "SOCIOLOGO" | "SOCIÓLOGO" | "CIENTISTA POLÍTICO" | "HISTORIADOR" => {
            "social scientist/historian"
        }
        "CORRETOR DE IMÓVEIS, SEGUROS, TÍTULOS E VALORES"
        | "ECONOMISTA"
        | "BANCARIO E ECONOMIARIO"
        | "BANCÁRIO E ECONOMIÁRIO"
        | "LEILOEIRO, AVALIADOR E ASSEMELHADOS"
        | "SECURITARIO" => "broker/economist/banker",
        "ADMINISTRADOR" | "EMPRESARIO" | "EMPRESÁRIO" | "GERENTE" | "DIRETOR DE EMPRESAS" => {
            "businessperson/entrepreneur"
        }
        "ATLETA PROFISSIONAL E TECNICO EM DESPORTOS"
        | "ATLETA PROFISSIONAL E TÉCNICO EM DESPORTOS" => "athlete",
        "SACERDOTE OU MEMBRO DE ORDEM OU SEITA RELIGIOSA" => "religious",
        "DIPLOMATA" => "diplomat",
        "RELAÇÕES-PÚBLICAS" => "public relations",
        "GEÓLOGO" | "GEÓGRAFO" => "geologist",
        "DONA DE CASA" | "APOSENTADO (EXCETO SERVIDOR PUBLICO)"
        | "APOSENTADO (EXCETO SERVIDOR PÚBLICO)" => "houseperson/retired",
        "ESCRITOR E CRÍTICO" => "writer",
        "ANALISTA DE SISTEMAS" => "computer scientist",
        _ => "other",
    };
    label.to_string()
}

/// Collapse a raw education string onto its canonical level. Unmapped
/// values pass through unchanged so new source labels stay visible.
fn classify_education(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "other".to_string();
    };
    let upper = raw.to_uppercase();
    let label = match upper.as_str() {
        "DOUTORADO" | "MESTRADO" | "DOUTORADO INCOMPLETO" | "PÓS-GRADUAÇÃO" => "graduate",
        "MESTRADO INCOMPLETO" | "SUPERIOR COMPLETO" | "SUPERIOR" => "undergraduate",
        "SUPERIOR INCOMPLETO" | "2º GRAU COMPLETO" | "ENSINO MÉDIO" | "ENSINO MÉDIO COMPLETO"
        | "MÉDIO COMPLETO" | "SECUNDÁRIO" | "ENSINO TÉCNICO" | "GINASIAL" => "high school",
        "ENSINO FUNDAMENTAL" | "ENSINO FUNDAMENTAL COMPLETO" | "1º GRAU COMPLETO"
        | "FUNDAMENTAL COMPLETO" | "PRIMÁRIO" | "SECUNDÁRIO INCOMPLETO"
        | "2º GRAU INCOMPLETO" | "ENSINO MÉDIO INCOMPLETO" | "MÉDIO INCOMPLETO" => {
            "elementary school"
        }
        "PRIMÁRIO INCOMPLETO" | "ENSINO FUNDAMENTAL INCOMPLETO" | "1º GRAU INCOMPLETO"
        | "FUNDAMENTAL INCOMPLETO" | "LÊ E ESCREVE" => "no education",
        "NÃO INFORMADO" | "OTHER" => "other",
        _ => {
            warn!(education = upper.as_str(), "Education level not found");
            return upper;
        }
    };
    label.to_string()
}

/// Region of a Brazilian state code
fn region_of(uf: &str) -> Option<&'static str> {
    let region = match uf {
        "AM" | "RR" | "AP" | "PA" | "TO" | "RO" | "AC" => "Norte",
        "MA" | "PI" | "CE" | "RN" | "PE" | "PB" | "SE" | "AL" | "BA" => "Nordeste",
        "MT" | "MS" | "GO" => "Centro-Oeste",
        "DF" => "Distrito Federal",
        "SP" | "RJ" | "ES" | "MG" => "Sudeste",
        "PR" | "RS" | "SC" => "Sul",
        _ => return None,
    };
    Some(region)
}

/// Age bracket at election time; right-closed decade bins, so age 30
/// falls in "0-30". Unparseable dates and out-of-range ages give no group.
fn age_group(birth_date: Option<&str>, election_year: i32) -> Option<&'static str> {
    let date = NaiveDate::parse_from_str(birth_date?, "%Y-%m-%d").ok()?;
    let age = election_year - date.year();
    match age {
        1..=30 => Some("0-30"),
        31..=40 => Some("30-40"),
        41..=50 => Some("40-50"),
        51..=60 => Some("50-60"),
        61..=70 => Some("60-70"),
        71..=80 => Some("70-80"),
        81..=90 => Some("80-90"),
        91..=100 => Some("90-100"),
        _ => None,
    }
}

/// Treat declared-unavailable ethnicities as missing
fn normalize_ethnicity(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(value) if !value.is_empty() && value != "NÃO INFORMADO" && value != "NÃO DIVULGÁVEL" => {
            Some(value.to_string())
        }
        _ => None,
    }
}

/// Fill missing slots from the nearest later value, then from the nearest
/// earlier one
fn fill_gaps(values: &mut [Option<String>]) {
    for i in (0..values.len().saturating_sub(1)).rev() {
        if values[i].is_none() {
            values[i] = values[i + 1].clone();
        }
    }
    for i in 1..values.len() {
        if values[i].is_none() {
            values[i] = values[i - 1].clone();
        }
    }
}

fn build_features(record: &LegislatorRecord) -> BTreeMap<String, String> {
    let mut features = BTreeMap::new();
    if let Some(party) = &record.party {
        features.insert("siglaPartido".to_string(), party.clone());
    }
    if let Some(state) = &record.state {
        features.insert("siglaUf".to_string(), state.clone());
        if let Some(region) = region_of(state) {
            features.insert("region".to_string(), region.to_string());
        }
    }
    if let Some(gender) = &record.gender {
        features.insert("gender".to_string(), gender.clone());
    }
    features.insert(
        "education".to_string(),
        classify_education(record.education.as_deref()),
    );
    features.insert(
        "occupation".to_string(),
        classify_occupation(record.occupation.as_deref()),
    );
    if let Some(group) = age_group(record.birth_date.as_deref(), record.election_year) {
        features.insert("age_group".to_string(), group.to_string());
    }
    features
}

/// Prepare raw records for graph assembly. Output is sorted by
/// (id, election_year); ethnicity is filled across each legislator's
/// mandates in that order.
pub fn prepare(mut records: Vec<LegislatorRecord>) -> Vec<PreparedLegislator> {
    records.sort_by_key(|record| (record.id, record.election_year));

    let mut ethnicities: Vec<Option<String>> = records
        .iter()
        .map(|record| normalize_ethnicity(record.ethnicity.as_deref()))
        .collect();

    let mut start = 0;
    while start < records.len() {
        let mut end = start + 1;
        while end < records.len() && records[end].id == records[start].id {
            end += 1;
        }
        fill_gaps(&mut ethnicities[start..end]);
        start = end;
    }

    records
        .into_iter()
        .zip(ethnicities)
        .map(|(record, ethnicity)| {
            let mut features = build_features(&record);
            if let Some(ethnicity) = ethnicity {
                features.insert("ethnicity".to_string(), ethnicity);
            }
            PreparedLegislator {
                id: record.id,
                legislature: record.legislature,
                election_year: record.election_year,
                features,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, legislature: u32, election_year: i32) -> LegislatorRecord {
        LegislatorRecord {
            id,
            legislature,
            election_year,
            party: Some("PT".to_string()),
            state: Some("SP".to_string()),
            gender: Some("F".to_string()),
            birth_date: Some("1965-04-12".to_string()),
            education: Some("SUPERIOR COMPLETO".to_string()),
            occupation: Some("ADVOGADO".to_string()),
            ethnicity: None,
        }
    }

    #[test]
    fn test_classify_occupation() {
        assert_eq!(classify_occupation(Some("Advogado")), "judge/lawyer/prosecutor");
        assert_eq!(classify_occupation(Some("DEPUTADO")), "politician");
        assert_eq!(classify_occupation(Some("pedagogo")), "teacher");
        assert_eq!(classify_occupation(Some("ASTRONAUTA")), "other");
        assert_eq!(classify_occupation(None), "other");
    }

    #[test]
    fn test_classify_education() {
        assert_eq!(classify_education(Some("doutorado")), "graduate");
        assert_eq!(classify_education(Some("MESTRADO INCOMPLETO")), "undergraduate");
        assert_eq!(classify_education(Some("Superior Incompleto")), "high school");
        assert_eq!(classify_education(None), "other");
        // unmapped levels pass through uppercased
        assert_eq!(classify_education(Some("autodidata")), "AUTODIDATA");
    }

    #[test]
    fn test_region_of() {
        assert_eq!(region_of("SP"), Some("Sudeste"));
        assert_eq!(region_of("DF"), Some("Distrito Federal"));
        assert_eq!(region_of("BA"), Some("Nordeste"));
        assert_eq!(region_of("XX"), None);
    }

    #[test]
    fn test_age_group_bins_are_right_closed() {
        assert_eq!(age_group(Some("1970-05-01"), 2000), Some("0-30"));
        assert_eq!(age_group(Some("1969-05-01"), 2000), Some("30-40"));
        assert_eq!(age_group(Some("1960-01-01"), 2000), Some("30-40"));
        assert_eq!(age_group(Some("2000-01-01"), 2000), None);
        assert_eq!(age_group(Some("not-a-date"), 2000), None);
        assert_eq!(age_group(None, 2000), None);
    }

    #[test]
    fn test_ethnicity_sentinels_are_missing() {
        assert_eq!(normalize_ethnicity(Some("PARDA")), Some("PARDA".to_string()));
        assert_eq!(normalize_ethnicity(Some("NÃO INFORMADO")), None);
        assert_eq!(normalize_ethnicity(Some("NÃO DIVULGÁVEL")), None);
        assert_eq!(normalize_ethnicity(Some("")), None);
        assert_eq!(normalize_ethnicity(None), None);
    }

    #[test]
    fn test_ethnicity_filled_across_mandates() {
        let mut first = record(1, 52, 2002);
        first.ethnicity = None;
        let mut second = record(1, 53, 2006);
        second.ethnicity = Some("PARDA".to_string());
        let mut third = record(1, 54, 2010);
        third.ethnicity = Some("NÃO INFORMADO".to_string());
        let mut other = record(2, 54, 2010);
        other.ethnicity = None;

        // deliberately unsorted input
        let prepared = prepare(vec![third, other, first, second]);

        assert_eq!(prepared.len(), 4);
        assert_eq!(prepared[0].features.get("ethnicity").map(String::as_str), Some("PARDA"));
        assert_eq!(prepared[1].features.get("ethnicity").map(String::as_str), Some("PARDA"));
        assert_eq!(prepared[2].features.get("ethnicity").map(String::as_str), Some("PARDA"));
        // no value anywhere for the other legislator
        assert_eq!(prepared[3].features.get("ethnicity"), None);
    }

    #[test]
    fn test_prepare_builds_full_feature_map() {
        let mut raw = record(7, 56, 2018);
        raw.ethnicity = Some("BRANCA".to_string());
        let prepared = prepare(vec![raw]);
        let features = &prepared[0].features;

        assert_eq!(features.get("siglaPartido").map(String::as_str), Some("PT"));
        assert_eq!(features.get("siglaUf").map(String::as_str), Some("SP"));
        assert_eq!(features.get("region").map(String::as_str), Some("Sudeste"));
        assert_eq!(features.get("gender").map(String::as_str), Some("F"));
        assert_eq!(features.get("education").map(String::as_str), Some("undergraduate"));
        assert_eq!(
            features.get("occupation").map(String::as_str),
            Some("judge/lawyer/prosecutor")
        );
        assert_eq!(features.get("age_group").map(String::as_str), Some("50-60"));
        assert_eq!(features.get("ethnicity").map(String::as_str), Some("BRANCA"));
    }

    #[test]
    fn test_missing_state_leaves_region_out() {
        let mut raw = record(7, 56, 2018);
        raw.state = None;
        let prepared = prepare(vec![raw]);
        let features = &prepared[0].features;

        assert!(!features.contains_key("siglaUf"));
        assert!(!features.contains_key("region"));
        assert!(features.contains_key("education"));
    }
}
