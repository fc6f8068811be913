// ==========================================
// 集成测试辅助模块
// ==========================================
// 各测试二进制只用到其中一部分
#![allow(dead_code)]

pub mod scenario_builder;
pub mod workbook_fixture;
