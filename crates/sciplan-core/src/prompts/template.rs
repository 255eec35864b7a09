//! Student-report template prompts: generation from an experiment design and
//! teacher-requested revision.

use crate::render::render_template;

/// Build a student report template from a finished experiment design. The
/// table and graph sections are emitted as HTML so the document exporter can
/// post-process them; everything else stays markdown.
pub const STUDENT_REPORT_TEMPLATE_PROMPT: &str = r###"다음 실험 설계안을 바탕으로, 학생들이 실험 결과를 기록하고 분석할 수 있는 보고서 템플릿을 생성해 주세요.

[실험 설계안]
{{experimentDesign}}

다음 요소만을 포함하는 간단한 학생용 보고서 템플릿을 만들어 주세요:

1. 학생 정보 입력란 (학년/반/번호/이름)
2. 실험 제목
3. 실험 목표
4. 준비물
5. 실험 과정
6. **"## 관찰 및 측정 결과" 제목과 함께 측정 결과를 기록할 수 있는 표** (최대 5회 실험)
7. **"## 데이터 그래프" 제목과 함께 데이터를 그래프로 표현할 수 있는 그래프 영역** (좌표평면 포함)
8. 결과 분석을 위한 안내 질문
9. 결론

**중요: 반드시 마크다운 형식으로 응답해주세요. HTML 태그는 표와 그래프 영역에만 사용하고, 나머지는 마크다운 문법을 사용하세요.**

**섹션 제목 작성 규칙:**
- "관찰 및 측정 결과" 섹션에는 반드시 "## 관찰 및 측정 결과" 제목을 포함하세요
- "데이터 그래프" 섹션에는 반드시 "## 데이터 그래프" 제목을 포함하세요
- 각 섹션 제목은 마크다운 ## 형식을 사용하세요

**응답 형식 주의사항:**
- 마크다운 코드블록 표시를 절대 사용하지 마세요
- 응답의 맨 앞과 맨 뒤에 백틱 3개 표시를 넣지 마세요
- 템플릿 내용만 직접 출력해주세요
- Word 다운로드시 정상적으로 표시되도록 순수한 마크다운과 HTML만 사용하세요

**표 작성 지침:**
- 실험의 특성에 맞는 측정 항목들(시간, 거리, 온도, 전압, 전류 등)을 표의 열 제목으로 사용하세요
- 최대 5회의 실험 데이터를 입력할 수 있도록 행을 구성하세요
- 표의 각 열에는 단위를 명확히 표시하세요
- 표는 다음과 같은 HTML 형식으로 작성하세요:

<table border="1">
<tr><th>항목1</th><th>항목2</th></tr>
<tr><td></td><td></td></tr>
</table>

**그래프 영역 작성 지침:**
그래프 영역은 다음 형식을 그대로 사용하세요:

<div class="graph-container">
<div class="graph-title">(그래프 1) 실험 결과 그래프</div>
<div class="graph-area">
<img src="data:image/svg+xml;base64,{{graphPlaceholder}}" alt="좌표평면 그래프" style="width: 500px; height: 375px; border: 1px solid #ccc; display: block; margin: 10px auto;">
<div style="text-align: center; margin-top: 10px; font-size: 12px; color: #666;">위 좌표평면에 실험 결과를 점으로 찍고 선으로 연결하여 그래프를 그려보세요.</div>
</div>
</div>

**학생 정보 입력란 예시:**

**학년: _______ 반: _______ 번호: _______ 이름: _____________________**

보고서 템플릿은 중고등학생이 이해하고 작성하기 쉬운 형식이어야 하며, 실험의 주요 개념을 학습할 수 있도록 구성되어야 합니다.
"###;

/// Revision prompt: keeps the experiment content fixed and changes only the
/// template's structure.
pub const TEMPLATE_REVISION_PROMPT: &str = r#"다음은 기존의 실험 설계안과 학생용 보고서 템플릿, 그리고 교사의 템플릿 수정 요청입니다.
**실험 내용은 전혀 변경하지 말고**, 학생용 보고서 템플릿의 형식과 구조만 수정해 주세요.

[원본 실험 설계안]
{{originalExperiment}}

[현재 학생용 템플릿]
{{originalTemplate}}

[템플릿 수정 요청 사항]
{{revisionRequest}}

다음 사항을 주의해서 수정해 주세요:

1. **실험의 제목, 목표, 준비물, 과정 등은 절대 변경하지 마세요**
2. **템플릿의 형식, 구조, 표의 크기, 질문의 내용 등만 수정하세요**
3. 기존 템플릿의 전체적인 틀은 유지하되, 요청된 부분만 개선하세요
4. 수정된 부분이 학생들이 사용하기에 더 편리하도록 구성하세요
5. HTML 표 형식은 기존과 동일하게 유지하세요

수정 요청을 반영한 개선된 학생용 보고서 템플릿을 제공해 주세요.
"#;

/// Base64 payload of the blank coordinate-plane SVG inserted into the graph
/// area. Target viewers replace it with a grid table at export time.
const GRAPH_PLACEHOLDER_B64: &str = "PHN2ZyB3aWR0aD0iNjAwIiBoZWlnaHQ9IjQ1MCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSJ3aGl0ZSIgc3Ryb2tlPSIjMzMzIiBzdHJva2Utd2lkdGg9IjIiLz48bGluZSB4MT0iNjAiIHkxPSIzOTAiIHgyPSI1NzAiIHkyPSIzOTAiIHN0cm9rZT0iIzAwMCIgc3Ryb2tlLXdpZHRoPSIzIi8+PGxpbmUgeDE9IjYwIiB5MT0iNjAiIHgyPSI2MCIgeTI9IjM5MCIgc3Ryb2tlPSIjMDAwIiBzdHJva2Utd2lkdGg9IjMiLz48L3N2Zz4=";

pub fn student_report_template_prompt(experiment_design: &str) -> String {
    render_template(
        STUDENT_REPORT_TEMPLATE_PROMPT,
        &[
            ("experimentDesign", experiment_design),
            ("graphPlaceholder", GRAPH_PLACEHOLDER_B64),
        ],
    )
}

pub fn template_revision_prompt(
    original_experiment: &str,
    original_template: &str,
    revision_request: &str,
) -> String {
    render_template(
        TEMPLATE_REVISION_PROMPT,
        &[
            ("originalExperiment", original_experiment),
            ("originalTemplate", original_template),
            ("revisionRequest", revision_request),
        ],
    )
}
