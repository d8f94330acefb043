//! Offline writing-assistant heuristics.
//!
//! Used whenever the optimize endpoints cannot be reached with a valid
//! session. Output is deterministic for a given input and written in the
//! same language as the script markers it looks for.

use regex::Regex;
use std::sync::LazyLock;
use storyline_protocol::{Suggestion, SuggestionKind};

const SCENE_MARKER: &str = "=== 场景";
const DIALOGUE_MARKER: &str = "：（";
const VISUAL_MARKER: &str = "[画面描述]";
const LEAD_ROLE: &str = "主角";
const SUPPORTING_ROLE: &str = "配角";
const OPENING_SCENE: &str = "=== 场景1：开头 ===";
const SCRIPT_HEADER: &str = "剧本\n\n类型：剧情\n目标时长：5分钟";

/// Focus appended to the prompt, one per variant.
const PROMPT_FOCUSES: [&str; 5] = [
    "包含详细的角色设定和情感冲突",
    "突出视觉效果和画面感",
    "加入意想不到的剧情转折",
    "注重对话的自然流畅和个性化",
    "营造特定的氛围和情绪基调",
];

static DIALOGUE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^：\n]+)：([^\n]+)").expect("dialogue pattern"));

static SCENE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=== 场景[^=]+===").expect("scene heading pattern"));

/// Five rewrites of `prompt`, each stressing a different aspect.
pub fn prompt_variants(prompt: &str) -> Vec<String> {
    PROMPT_FOCUSES
        .iter()
        .map(|focus| format!("{prompt}，{focus}"))
        .collect()
}

/// Structural suggestions for script `content`, at most one per kind.
pub fn content_suggestions(content: &str) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if !content.contains(SCENE_MARKER) {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Structure,
            title: "剧本结构优化".to_string(),
            description: "建议按照标准剧本结构组织内容".to_string(),
            suggestion: scene_skeleton(content),
        });
    }

    if !content.contains(DIALOGUE_MARKER) {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Dialogue,
            title: "对话格式优化".to_string(),
            description: "建议使用标准对话格式".to_string(),
            suggestion: DIALOGUE_LINE
                .replace_all(content, "$1：（$2）")
                .into_owned(),
        });
    }

    if !content.contains(VISUAL_MARKER) {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Description,
            title: "画面描述增强".to_string(),
            description: "建议添加详细的画面描述".to_string(),
            suggestion: SCENE_HEADING
                .replace_all(content, "$0\n\n[画面描述]\n镜头推进，展示场景细节...")
                .into_owned(),
        });
    }

    if !content.contains(LEAD_ROLE) || !content.contains(SUPPORTING_ROLE) {
        let renamed = content
            .replace("角色A", LEAD_ROLE)
            .replace("角色B", SUPPORTING_ROLE);
        let with_cast = renamed.replacen(
            OPENING_SCENE,
            &format!(
                "{OPENING_SCENE}\n\n[角色设定]\n{LEAD_ROLE}：主要人物，性格特点...\n{SUPPORTING_ROLE}：重要配角，与主角的关系..."
            ),
            1,
        );
        suggestions.push(Suggestion {
            kind: SuggestionKind::Character,
            title: "角色设定完善".to_string(),
            description: "建议明确角色设定和关系".to_string(),
            suggestion: with_cast,
        });
    }

    suggestions
}

fn scene_skeleton(content: &str) -> String {
    format!(
        "{SCRIPT_HEADER}\n\n{OPENING_SCENE}\n\n{VISUAL_MARKER}\n{content}\n\n\
         === 场景2：发展 ===\n\n{VISUAL_MARKER}\n...\n\n\
         === 场景3：高潮 ===\n\n{VISUAL_MARKER}\n...\n\n\
         === 场景4：结局 ===\n\n{VISUAL_MARKER}\n...\n\n\
         === 完 ==="
    )
}
