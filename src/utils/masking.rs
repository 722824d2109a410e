//! 個人資料遮罩：寫入日誌前把姓名、所屬替換成固定字串。

const MASKED_NAME: &str = "[MASKED_NAME]";
const MASKED_AFFILIATION: &str = "[MASKED_AFFILIATION]";

pub fn mask_name(_name: &str) -> &'static str {
    MASKED_NAME
}

pub fn mask_affiliation(affiliation: Option<&str>) -> &'static str {
    match affiliation {
        Some(_) => MASKED_AFFILIATION,
        None => "-",
    }
}
