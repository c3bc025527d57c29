//! 结构化生成的响应解析与契约复核

use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::error::{ResearchError, Result};

/// 从模型的自由文本响应中提取首个完整的JSON对象
///
/// 逐字符做花括号配对，正确跳过字符串字面量与转义符，
/// 因此Markdown代码块包裹或前后缀说明文字都不影响提取。
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let mut brace_count = 0usize;
    let mut start_pos = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if brace_count == 0 {
                    start_pos = Some(i);
                }
                brace_count += 1;
            }
            '}' if !in_string => {
                if brace_count > 0 {
                    brace_count -= 1;
                    if brace_count == 0 {
                        let start = start_pos?;
                        return Some(&text[start..i + ch.len_utf8()]);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// 将返回对象与声明结构的必填字段与字段类型逐一比对
///
/// 这是在provider侧校验之外的显式防御性复核：
/// 缺失必填字段或类型不符时报`SchemaViolation`。
pub fn verify_schema_contract<T: JsonSchema>(value: &Value) -> Result<()> {
    let schema = serde_json::to_value(schema_for!(T))
        .map_err(|e| ResearchError::SchemaViolation(format!("无法序列化结构声明: {}", e)))?;

    let object = value.as_object().ok_or_else(|| {
        ResearchError::SchemaViolation("模型返回的不是JSON对象".to_string())
    })?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(field) {
                return Err(ResearchError::SchemaViolation(format!(
                    "缺少必填字段 `{}`",
                    field
                )));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (field, declared) in properties {
            let Some(actual) = object.get(field) else {
                continue;
            };
            if !matches_declared_type(actual, declared) {
                return Err(ResearchError::SchemaViolation(format!(
                    "字段 `{}` 的类型与声明不符",
                    field
                )));
            }
        }
    }

    Ok(())
}

/// 字段类型比对，声明中的type可能是单个类型名或候选类型数组
fn matches_declared_type(actual: &Value, declared: &Value) -> bool {
    match declared.get("type") {
        Some(Value::String(ty)) => value_matches_type(actual, ty),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|ty| value_matches_type(actual, ty)),
        _ => true,
    }
}

fn value_matches_type(value: &Value, ty: &str) -> bool {
    match ty {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "null" => value.is_null(),
        _ => true,
    }
}
