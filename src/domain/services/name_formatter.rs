// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 姓名格式化服务
///
/// 将自由输入的姓名规范为 "Фамилия И.О." 形式，用于匹配与存储。
/// 无法规范化的输入原样返回，从不报错。
pub struct NameFormatter;

impl NameFormatter {
    /// 规范化姓名
    ///
    /// # 参数
    ///
    /// * `raw` - 自由输入的姓名
    ///
    /// # 返回值
    ///
    /// 已是规范形式或少于两个词时原样返回，否则为 "姓 + 各后续词首字母加点"
    pub fn format(raw: &str) -> String {
        if Self::is_canonical(raw) {
            return raw.to_string();
        }

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < 2 {
            return raw.to_string();
        }

        let initials: String = tokens[1..]
            .iter()
            .filter_map(|token| token.chars().next())
            .map(|c| format!("{c}."))
            .collect();

        format!("{} {}", tokens[0], initials)
    }

    /// 是否为 "Фамилия И.О." 形式：一个姓氏词 + 两个大写首字母加点
    pub fn is_canonical(raw: &str) -> bool {
        let Some((surname, initials)) = raw.split_once(' ') else {
            return false;
        };
        is_surname(surname) && is_two_initials(initials)
    }
}

fn is_surname(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() && first.is_uppercase() => {
            chars.all(|c| c.is_alphabetic() || c == '-')
        }
        _ => false,
    }
}

fn is_two_initials(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    matches!(
        chars.as_slice(),
        [a, '.', b, '.'] if a.is_alphabetic() && a.is_uppercase() && b.is_alphabetic() && b.is_uppercase()
    )
}
