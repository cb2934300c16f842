// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default multilingual keyword families for the rule classifier.
//!
//! Entries are lower-case and matched as substrings of the lower-cased user
//! text. Trailing spaces are significant (`"def "` does not match `"define"`).
//! Covered languages: English, Chinese, Japanese, Russian, German, Spanish,
//! Portuguese.

pub(crate) fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub const CODE: &[&str] = &[
    "function", "class ", "import ", "def ", "select ", "async ", "await ", "const ", "let ",
    "var ", "return ", "```", "struct ", "impl ", "#include", "public static",
    // zh / ja / ru / de / es / pt
    "函数", "代码", "関数", "コード", "функци", "код ", "funktion", "quellcode", "función",
    "código", "função",
];

pub const REASONING: &[&str] = &[
    "prove", "theorem", "derive", "step by step", "chain of thought", "formally",
    "mathematical proof", "logically", "contradiction", "lemma", "induction",
    // zh / ja / ru / de / es / pt
    "证明", "定理", "推导", "逐步", "証明", "段階的", "доказ", "теорем", "beweis", "schritt für schritt",
    "demostrar", "paso a paso", "demonstrar", "passo a passo",
];

pub const TECHNICAL: &[&str] = &[
    "algorithm", "optimize", "architecture", "distributed", "kubernetes", "microservice",
    "database", "infrastructure", "concurrency", "latency", "throughput", "encryption",
    "protocol", "compiler", "scalab",
    // zh / ja / ru / de / es / pt
    "算法", "架构", "分布式", "数据库", "アルゴリズム", "алгоритм", "архитектур", "algorithmus",
    "datenbank", "algoritmo", "arquitectura", "arquitetura",
];

pub const CREATIVE: &[&str] = &[
    "story", "poem", "compose", "brainstorm", "creative", "imagine", "write a song", "fiction",
    "lyrics",
    // zh / ja / ru / de / es / pt
    "故事", "诗", "物語", "стихотворен", "рассказ", "gedicht", "poema", "cuento", "canção",
];

pub const SIMPLE: &[&str] = &[
    "what is", "define", "translate", "hello", "yes or no", "capital of", "how old", "who is",
    "when was", "meaning of", "what's",
    // zh / ja / ru / de / es / pt
    "什么是", "你好", "翻译", "とは", "こんにちは", "что такое", "привет", "was ist", "hallo",
    "qué es", "hola", "o que é", "olá",
];

pub const IMPERATIVE: &[&str] = &[
    "build", "create", "implement", "design", "develop", "construct", "generate", "deploy",
    "configure", "set up",
    // zh / ja / ru / de / es / pt
    "构建", "创建", "实现", "作成", "実装", "создай", "реализуй", "erstelle", "implementiere",
    "crea ", "implementa", "construa",
];

pub const CONSTRAINT: &[&str] = &[
    "at most", "at least", "within", "no more than", "o(", "maximum", "minimum", "limit",
    "budget", "must not exceed",
    // zh / ja / ru / de / es / pt
    "不超过", "至少", "最多", "以内", "не более", "не менее", "höchstens", "mindestens",
    "como máximo", "no más de", "no máximo",
];

pub const OUTPUT_FORMAT: &[&str] = &[
    "json", "yaml", "xml", "table", "csv", "markdown", "schema", "format as", "structured",
    // zh / ja / ru / de / es / pt
    "表格", "格式", "表形式", "таблиц", "tabelle", "tabla", "tabela",
];

pub const REFERENCE: &[&str] = &[
    "above", "below", "previous", "following", "the docs", "the api", "the code", "earlier",
    "attached",
    // zh / ja / ru / de / es / pt
    "上面", "之前", "上記", "выше", "ранее", "oben", "vorherige", "anterior", "arriba", "acima",
];

pub const NEGATION: &[&str] = &[
    "don't", "do not", "avoid", "never", "without", "except", "exclude", "no longer",
    // zh / ja / ru / de / es / pt
    "不要", "避免", "しないで", "нельзя", "избега", "nicht", "ohne", "evitar", "nunca",
];

pub const DOMAIN: &[&str] = &[
    "quantum", "fpga", "vlsi", "risc-v", "asic", "photonics", "genomics", "proteomics",
    "topological", "homomorphic", "zero-knowledge", "lattice-based",
    // zh / ja / ru / de / es / pt
    "量子", "квант", "quanten", "cuántic", "quântic",
];

pub const AGENTIC: &[&str] = &[
    "read file", "read the file", "look at", "check the", "open the", "edit", "modify",
    "update the", "change the", "write to", "create file", "execute", "deploy", "install",
    "npm ", "pip ", "compile", "after that", "and also", "once done", "step 1", "step 2",
    "fix", "debug", "until it works", "keep trying", "iterate", "make sure", "verify",
    "confirm",
    // zh / ja / ru / de / es / pt
    "编辑", "修改", "部署", "修复", "调试", "修正", "исправ", "bearbeite", "behebe",
    "arregla", "corrige",
];

pub const BROWSER: &[&str] = &[
    "click", "navigate", "browser", "web page", "webpage", "screenshot", "scrape",
    "fill out the form", "log in to", "open the website", "go to the site", "selenium",
    "playwright", "puppeteer",
    // zh / ja / ru / de / es / pt
    "浏览器", "网页", "点击", "ブラウザ", "браузер", "webseite", "navegador",
];

/// System-prompt keywords that indicate the caller expects structured output.
pub const STRUCTURED_OUTPUT: &[&str] = &["json", "structured", "schema"];
