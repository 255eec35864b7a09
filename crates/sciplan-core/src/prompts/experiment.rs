//! Experiment-design prompts: initial generation and teacher-requested revision.

use crate::render::render_template;
use crate::shared::SubmissionForm;

/// Initial experiment-design prompt. Bound from the submitted form plus the
/// formatted prerequisite material.
pub const EXPERIMENT_DESIGN_PROMPT: &str = r#"당신은 과학 교육 전문가입니다. 아래 교육과정 정보와 교사의 의도를 바탕으로 학교 현장에서 바로 활용할 수 있는 실험 설계안을 작성해 주세요.

[교육과정 정보]
- 학교급: {{schoolLevel}}
- 학년군: {{gradeGroup}}
- 과목: {{subject}}
- 단원: {{unit}}
- 내용 요소: {{contentElements}}

[선수학습 내용]
{{prerequisiteContent}}

[실험 주제]
{{experimentTopic}}

[수업 의도]
{{teacherIntent}}

[참고 자료]
{{referenceContent}}

다음 항목을 포함하는 실험 설계안을 작성해 주세요:

1. 실험 제목
2. 실험 목표 (내용 요소와 연계)
3. 준비물 (수량 포함)
4. 실험 과정 (단계별, 안전 유의사항 포함)
5. 예상 결과
6. 평가 방법

**중요: 반드시 마크다운 형식으로 응답해주세요.**

**응답 형식 주의사항:**
- 마크다운 코드블록 표시를 절대 사용하지 마세요
- 응답의 맨 앞과 맨 뒤에 백틱 3개 표시를 넣지 마세요
- 실험 설계안 내용만 직접 출력해주세요

실험은 선택된 학년군의 수준에 맞아야 하며, 선수학습 내용을 기반으로 구성되어야 합니다.
"#;

/// Revision prompt: the stored experiment plus the teacher's change request.
pub const EXPERIMENT_REVISION_PROMPT: &str = r#"다음은 기존의 실험 설계안과 교사의 수정 요청입니다. 수정 요청을 반영하여 실험 설계안을 개선해 주세요.

[원본 실험 설계안]
{{originalExperiment}}

[수정 요청 사항]
{{revisionRequest}}

다음 사항을 주의해서 수정해 주세요:

1. 수정 요청과 직접 관련된 부분만 변경하세요
2. 기존 설계안의 전체적인 틀과 형식은 유지하세요
3. 학년군 수준과 안전 유의사항은 계속 지켜주세요

수정 요청을 반영한 개선된 실험 설계안 전체를 마크다운 형식으로 제공해 주세요. 코드블록 표시는 사용하지 마세요.
"#;

/// Bind the design prompt from a normalized submission and the formatted
/// prerequisite text. An empty reference slot renders as an explicit marker.
pub fn experiment_design_prompt(form: &SubmissionForm, prerequisite_content: &str) -> String {
    let elements = form.selected_elements.join(", ");
    let reference = if form.reference_content.trim().is_empty() {
        "참고 자료 없음"
    } else {
        form.reference_content.as_str()
    };
    render_template(
        EXPERIMENT_DESIGN_PROMPT,
        &[
            ("schoolLevel", form.school_level.as_str()),
            ("gradeGroup", form.grade_group.as_str()),
            ("subject", form.subject.as_str()),
            ("unit", form.unit.as_str()),
            ("contentElements", elements.as_str()),
            ("prerequisiteContent", prerequisite_content),
            ("experimentTopic", form.experiment_topic.as_str()),
            ("teacherIntent", form.teacher_intent.as_str()),
            ("referenceContent", reference),
        ],
    )
}

pub fn experiment_revision_prompt(original_experiment: &str, revision_request: &str) -> String {
    render_template(
        EXPERIMENT_REVISION_PROMPT,
        &[
            ("originalExperiment", original_experiment),
            ("revisionRequest", revision_request),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_prompt_binds_every_placeholder() {
        let form = SubmissionForm {
            school_level: "고등학교".into(),
            grade_group: "10-12".into(),
            subject: "물리".into(),
            unit: "운동".into(),
            selected_elements: vec!["힘".into(), "가속도".into()],
            experiment_topic: "힘 관련 실험".into(),
            teacher_intent: "힘에 대한 이해를 높이기 위한 실험".into(),
            reference_content: String::new(),
        };

        let prompt = experiment_design_prompt(&form, "선수학습 내용이 없습니다.");
        assert!(prompt.contains("힘, 가속도"));
        assert!(prompt.contains("참고 자료 없음"));
        assert!(!prompt.contains("{{"));
    }
}
