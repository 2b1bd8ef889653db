//! Prompts and response schemas sent to the generative service.

use rackstock_model::AnalysisMode;
use serde_json::{Value, json};

const LABEL_PROMPT: &str = "You are an expert specialized in Optical Character Recognition (OCR) for IT hardware labels (servers, RAM, drives).

Task 1: Extract the Serial Number (SN) and Model Number (P/N) from the image.
  - SN usually follows \"SN\", \"S/N\", \"ISN\", \"Serial\".
  - Model usually follows \"Model\", \"P/N\", \"Part Number\".

Task 2: Extract ALL visible text segments on the label into a list.
  - The list is used for manual correction by the user.
  - Include every distinct alphanumeric string found.

Return a strict JSON object.";

const GENERAL_PROMPT: &str = "You are an expert IDC hardware technician. Analyze this image of a server component.
Identify the component type, manufacturer, model, and key specifications (capacity, speed, etc.).
Return the data in a strict JSON structure suitable for inventory entry.
If you cannot identify it clearly, make an educated guess.
The categories are: CPU, 内存, 硬盘, 网卡, 线缆, 电源, 其他.";

/// Extraction prompt for the given analysis mode.
pub fn analysis_prompt(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Label => LABEL_PROMPT,
        AnalysisMode::General => GENERAL_PROMPT,
    }
}

/// Response schema for the given analysis mode, in the service's
/// OpenAPI-subset dialect.
pub fn analysis_schema(mode: AnalysisMode) -> Value {
    let properties = match mode {
        AnalysisMode::Label => json!({
            "sn": { "type": "STRING", "description": "The extracted Serial Number" },
            "model": { "type": "STRING", "description": "The extracted Model Number" },
            "manufacturer": { "type": "STRING", "description": "Brand name if visible" },
            "all_text": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Every text string visible on the label, for user selection/correction"
            }
        }),
        AnalysisMode::General => json!({
            "name": { "type": "STRING", "description": "Short generic name e.g. Samsung 32GB RAM" },
            "category": { "type": "STRING", "description": "One of the allowed categories" },
            "model": { "type": "STRING", "description": "Model number or Part number" },
            "quantity_estimate": { "type": "INTEGER", "description": "Estimated count if multiple items are visible" },
            "specs": { "type": "STRING", "description": "Key technical specs" },
            "reasoning": { "type": "STRING", "description": "Why you identified it as such" }
        }),
    };
    json!({ "type": "OBJECT", "properties": properties })
}

/// System instruction for the chat assistant, embedding the inventory summary.
pub fn assistant_instruction(inventory_context: &str) -> String {
    format!(
        "你是一个专业的 IDC 机房资产管理助手。\n\
         你的任务是帮助管理员查询库存、提供服务器维护建议或分析数据。\n\
         当前库存数据的摘要如下:\n\
         {inventory_context}\n\n\
         请用简洁专业的中文回答。"
    )
}

#[cfg(test)]
mod tests {
    use super::{analysis_schema, assistant_instruction};
    use rackstock_model::AnalysisMode;

    #[test]
    fn label_schema_declares_all_text_array() {
        let schema = analysis_schema(AnalysisMode::Label);
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["all_text"]["type"], "ARRAY");
    }

    #[test]
    fn instruction_embeds_context() {
        let text = assistant_instruction("CPU (SN:1, Model:X): 4个, 位置 A-01");
        assert!(text.contains("位置 A-01"));
    }
}
