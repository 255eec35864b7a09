//! Curriculum catalog: the school-level → grade-band → subject → unit →
//! content-element dataset, prerequisite lookup, and the Korean→English
//! term table used to build video search queries.
//!
//! The dataset is embedded at compile time and parsed once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

const CURRICULUM_JSON: &str = include_str!("../data/curriculum.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolLevel {
    pub school_level: String,
    pub grade_groups: Vec<GradeGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeGroup {
    pub name: String,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    pub content_elements: Vec<String>,
}

/// One row of prerequisite material from an earlier grade band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteEntry {
    pub school_level: String,
    pub grade_group: String,
    pub subject: String,
    pub unit: String,
    pub content_elements: Vec<String>,
}

/// The full curriculum dataset. Grade-band order follows catalog order, which
/// is also the progression order used for prerequisite lookup.
#[derive(Debug, Clone)]
pub struct CurriculumCatalog {
    levels: Vec<SchoolLevel>,
}

static CATALOG: Lazy<CurriculumCatalog> = Lazy::new(|| {
    let levels: Vec<SchoolLevel> =
        serde_json::from_str(CURRICULUM_JSON).expect("embedded curriculum dataset is valid JSON");
    CurriculumCatalog { levels }
});

/// Shared handle to the embedded catalog.
pub fn catalog() -> &'static CurriculumCatalog {
    &CATALOG
}

impl CurriculumCatalog {
    pub fn school_levels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.school_level.as_str())
    }

    pub fn grade_groups(&self, school_level: &str) -> Vec<&str> {
        self.levels
            .iter()
            .filter(|l| l.school_level == school_level)
            .flat_map(|l| l.grade_groups.iter().map(|g| g.name.as_str()))
            .collect()
    }

    pub fn subjects(&self, school_level: &str, grade_group: &str) -> Vec<&str> {
        self.band(school_level, grade_group)
            .map(|band| band.subjects.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn units(&self, school_level: &str, grade_group: &str, subject: &str) -> Vec<&str> {
        self.band(school_level, grade_group)
            .and_then(|band| band.subjects.iter().find(|s| s.name == subject))
            .map(|s| s.units.iter().map(|u| u.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn content_elements(
        &self,
        school_level: &str,
        grade_group: &str,
        subject: &str,
        unit: &str,
    ) -> Option<&[String]> {
        self.band(school_level, grade_group)
            .and_then(|band| band.subjects.iter().find(|s| s.name == subject))
            .and_then(|s| s.units.iter().find(|u| u.name == unit))
            .map(|u| u.content_elements.as_slice())
    }

    /// Catalog entries from grade bands strictly earlier than the given one,
    /// in progression order. Used to inject prior learning into the
    /// experiment-design prompt.
    pub fn prerequisites(&self, school_level: &str, grade_group: &str) -> Vec<PrerequisiteEntry> {
        let mut entries = Vec::new();
        for level in &self.levels {
            for band in &level.grade_groups {
                if level.school_level == school_level && band.name == grade_group {
                    return entries;
                }
                for subject in &band.subjects {
                    for unit in &subject.units {
                        entries.push(PrerequisiteEntry {
                            school_level: level.school_level.clone(),
                            grade_group: band.name.clone(),
                            subject: subject.name.clone(),
                            unit: unit.name.clone(),
                            content_elements: unit.content_elements.clone(),
                        });
                    }
                }
            }
        }
        // unknown band: nothing precedes it
        Vec::new()
    }

    fn band(&self, school_level: &str, grade_group: &str) -> Option<&GradeGroup> {
        self.levels
            .iter()
            .find(|l| l.school_level == school_level)
            .and_then(|l| l.grade_groups.iter().find(|g| g.name == grade_group))
    }
}

/// Format prerequisite rows for prompt injection, grouped by school level and
/// grade band:
///
/// ```text
/// - 중학교 7-9:
///   - 여러 가지 힘: 힘, 중력, 탄성력, 마찰력
/// ```
pub fn format_prerequisites(entries: &[PrerequisiteEntry]) -> String {
    if entries.is_empty() {
        return "선수학습 내용이 없습니다.".to_string();
    }

    let mut result = String::new();
    let mut current_group: Option<(&str, &str)> = None;
    for entry in entries {
        let group = (entry.school_level.as_str(), entry.grade_group.as_str());
        if current_group != Some(group) {
            result.push_str(&format!("- {} {}:\n", group.0, group.1));
            current_group = Some(group);
        }
        result.push_str(&format!(
            "  - {}: {}\n",
            entry.unit,
            entry.content_elements.join(", ")
        ));
    }
    result
}

/// Korean→English table for curriculum content elements. Consulted before the
/// translation fallback when deriving the video search query.
static ELEMENT_TRANSLATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // physics
        ("힘", "force"),
        ("운동", "motion"),
        ("운동량", "momentum"),
        ("관성", "inertia"),
        ("관성력", "fictitious force"),
        ("탄성력", "restoring force"),
        ("가속도", "acceleration"),
        ("중력가속도", "gravitational acceleration"),
        ("중력", "gravity"),
        ("마찰력", "friction"),
        ("평형", "equilibrium"),
        ("에너지", "energy"),
        ("위치에너지", "potential energy"),
        ("탄성에너지", "elastic potential energy"),
        ("운동에너지", "kinetic energy"),
        ("전기", "electricity"),
        ("전류", "electric current"),
        ("자기", "magnetism"),
        ("자기장", "magnetic field"),
        ("전기장", "electric field"),
        ("전자기 유도", "electromagnetic induction"),
        ("파동", "wave"),
        ("빛", "light"),
        ("빛의 세기", "intensity of light"),
        ("굴절", "refraction"),
        ("렌즈", "lens"),
        ("소리", "sound"),
        ("진동", "vibration"),
        ("온도", "temperature"),
        ("열", "heat"),
        ("압력", "pressure"),
        ("속도", "velocity"),
        ("속력", "speed"),
        ("질량", "mass"),
        ("부피", "volume"),
        ("밀도", "density"),
        ("전압", "voltage"),
        ("저항", "resistance"),
        ("무게", "weight"),
        ("자석", "magnet"),
        // laws and principles
        ("옴의 법칙", "ohms law"),
        ("쿨롱의 법칙", "coulombs law"),
        ("패러데이 법칙", "faradays law"),
        ("뉴턴의 법칙", "newtons laws"),
        ("뉴턴의 운동 법칙", "newtons laws of motion"),
        ("만유인력의 법칙", "law of universal gravitation"),
        ("훅의 법칙", "hookes law"),
        ("베르누이 정리", "bernoulli principle"),
        ("아르키메데스 원리", "archimedes principle"),
        ("도플러 효과", "doppler effect"),
        // chemistry
        ("원자", "atom"),
        ("분자", "molecule"),
        ("이온", "ion"),
        ("원소", "element"),
        ("화합물", "compound"),
        ("반응", "reaction"),
        ("산화", "oxidation"),
        ("환원", "reduction"),
        ("중화", "neutralization"),
        ("용해", "dissolution"),
        ("결정", "crystal"),
        ("촉매", "catalyst"),
        ("pH", "pH"),
        ("산", "acid"),
        ("염기", "base"),
        ("염", "salt"),
        // biology
        ("세포", "cell"),
        ("광합성", "photosynthesis"),
        ("호흡", "respiration"),
        ("효소", "enzyme"),
        ("DNA", "DNA"),
        ("RNA", "RNA"),
        ("단백질", "protein"),
        ("유전", "genetics"),
        ("진화", "evolution"),
        ("생태계", "ecosystem"),
        ("환경", "environment"),
        // earth science
        ("지구", "earth"),
        ("대기", "atmosphere"),
        ("날씨", "weather"),
        ("기후", "climate"),
        ("지진", "earthquake"),
        ("화산", "volcano"),
        ("암석", "rock"),
        ("광물", "mineral"),
        ("태양계", "solar system"),
        ("별", "star"),
        ("행성", "planet"),
        // inquiry terms
        ("실험", "experiment"),
        ("관찰", "observation"),
        ("측정", "measurement"),
        ("분석", "analysis"),
        ("탐구", "inquiry"),
        ("가설", "hypothesis"),
        ("변인", "variable"),
        ("대조군", "control group"),
        ("실험군", "experimental group"),
    ])
});

/// English term for a curriculum element, when the static table knows it.
pub fn english_term(korean: &str) -> Option<&'static str> {
    ELEMENT_TRANSLATIONS.get(korean).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_the_physics_motion_unit() {
        let elements = catalog()
            .content_elements("고등학교", "10-12", "물리", "운동")
            .expect("unit present");
        assert!(elements.contains(&"힘".to_string()));
    }

    #[test]
    fn grade_groups_follow_catalog_order() {
        assert_eq!(catalog().grade_groups("초등학교"), vec!["3-4", "5-6"]);
    }

    #[test]
    fn prerequisites_cover_strictly_earlier_bands() {
        let entries = catalog().prerequisites("중학교", "7-9");
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.school_level == "초등학교"));

        let high = catalog().prerequisites("고등학교", "10-12");
        assert!(high.iter().any(|e| e.school_level == "중학교"));
        assert!(high.iter().all(|e| e.school_level != "고등학교"));

        assert!(catalog().prerequisites("초등학교", "3-4").is_empty());
    }

    #[test]
    fn prerequisite_formatting_groups_by_level_and_band() {
        let entries = vec![
            PrerequisiteEntry {
                school_level: "초등학교".into(),
                grade_group: "5-6".into(),
                subject: "과학".into(),
                unit: "물체의 운동".into(),
                content_elements: vec!["속력".into(), "위치".into()],
            },
            PrerequisiteEntry {
                school_level: "중학교".into(),
                grade_group: "7-9".into(),
                subject: "과학".into(),
                unit: "여러 가지 힘".into(),
                content_elements: vec!["힘".into(), "중력".into()],
            },
        ];

        let text = format_prerequisites(&entries);
        assert_eq!(
            text,
            "- 초등학교 5-6:\n  - 물체의 운동: 속력, 위치\n- 중학교 7-9:\n  - 여러 가지 힘: 힘, 중력\n"
        );
    }

    #[test]
    fn empty_prerequisites_format_to_placeholder() {
        assert_eq!(format_prerequisites(&[]), "선수학습 내용이 없습니다.");
    }

    #[test]
    fn element_translation_table() {
        assert_eq!(english_term("힘"), Some("force"));
        assert_eq!(english_term("도플러 효과"), Some("doppler effect"));
        assert_eq!(english_term("존재하지 않는 용어"), None);
    }
}
