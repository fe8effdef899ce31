use super::{Dataset, LinkRecord, ProviderRecord, TimeSeriesPoint, WriteupItem};

fn point(year: i32, value: f64, source_label: &str) -> TimeSeriesPoint {
    TimeSeriesPoint {
        year,
        value,
        source_label: source_label.to_string(),
    }
}

fn provider(name: &str, site_url: &str, logo_ref: &str, insights: &[&str]) -> ProviderRecord {
    ProviderRecord {
        name: name.to_string(),
        site_url: site_url.to_string(),
        insights: insights.iter().map(|s| s.to_string()).collect(),
        logo_ref: logo_ref.to_string(),
    }
}

fn link(href: &str, label: &str) -> LinkRecord {
    LinkRecord {
        href: href.to_string(),
        label: label.to_string(),
    }
}

fn item(key: &str, title: &str, body: &str) -> WriteupItem {
    WriteupItem {
        key: key.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

const PRECEDENCE: &str = "Precedence Research";
const GRAND_VIEW: &str = "Grand View Research";

pub(super) fn dataset() -> Dataset {
    Dataset {
        // AI API market, USD billions, as reported for each year
        market: vec![
            point(2024, 49.03, PRECEDENCE),
            point(2025, 64.41, PRECEDENCE),
            point(2030, 246.87, GRAND_VIEW),
            point(2034, 750.63, PRECEDENCE),
        ],
        providers: vec![
            provider(
                "OpenAI",
                "https://openai.com/",
                "/images/openai.png",
                &[
                    "Unified API for text, vision, and audio capabilities.",
                    "Strong enterprise adoption; rich tooling & docs.",
                    "Great for chat, summarization, and automation workloads.",
                ],
            ),
            provider(
                "Google Cloud AI",
                "https://cloud.google.com/vertex-ai",
                "/images/googleCloud.png",
                &[
                    "Vertex AI unifies 200+ foundation models, incl. Gemini.",
                    "Model Garden + enterprise governance & IAM controls.",
                    "Best fit when you already run on Google Cloud.",
                ],
            ),
            provider(
                "Hugging Face",
                "https://huggingface.co/",
                "/images/huggingface-color.png",
                &[
                    "Single interface to tens of thousands of open models.",
                    "Inference Endpoints and Providers for managed serving.",
                    "Great for avoiding lock-in & customizing models.",
                ],
            ),
            provider(
                "Stability AI",
                "https://stability.ai/",
                "/images/Stability.png",
                &[
                    "SDXL & related models for high-quality image generation.",
                    "Optimized variants (e.g., Turbo) for latency-sensitive use.",
                    "Ideal for creative, design, and marketing pipelines.",
                ],
            ),
            provider(
                "Anthropic",
                "https://www.anthropic.com/",
                "/images/anthropic.png",
                &[
                    "Claude models focus on safe, steerable outputs.",
                    "Strong enterprise features; long context windows.",
                    "Useful in regulated or compliance-heavy workflows.",
                ],
            ),
            provider(
                "Eden AI",
                "https://www.edenai.co/",
                "/images/eden.png",
                &[
                    "One token to access many providers via a unified API.",
                    "Live benchmarking on price, latency, and quality.",
                    "Reduces vendor lock-in; simplifies billing & auth.",
                ],
            ),
        ],
        chart_sources: vec![
            link("https://www.precedenceresearch.com/ai-api-market", PRECEDENCE),
            link(
                "https://www.grandviewresearch.com/industry-analysis/ai-api-market-report",
                GRAND_VIEW,
            ),
        ],
        references: vec![
            link(
                "https://www.precedenceresearch.com/ai-api-market",
                "Precedence Research — AI API Market 2024–2034",
            ),
            link(
                "https://www.grandviewresearch.com/industry-analysis/ai-api-market-report",
                "Grand View Research — AI API Market to 2030",
            ),
            link(
                "https://www.edenai.co/post/open-source-ai-apis-aggregator-by-eden-ai",
                "Eden AI — Open Source Aggregator",
            ),
            link(
                "https://api4.ai/blog/ai-apis-what-they-are-and-why-they-matter-to-business",
                "API4.AI — What are AI APIs (2025)",
            ),
            link(
                "https://www.sngular.com/insights/358/turn-your-apis-into-a-growth-engine-in-2025",
                "Sngular — APIs as a growth engine (2025)",
            ),
            link("https://www.toolmage.com/en/tool/eden-ai/", "Toolmage — Eden AI overview"),
            link("https://platform.openai.com/docs/models", "OpenAI — API & Models"),
            link("https://cloud.google.com/vertex-ai", "Google — Vertex AI"),
            link(
                "https://huggingface.co/docs/inference-providers/en/index",
                "Hugging Face — Inference Providers",
            ),
            link("https://platform.stability.ai/docs/api-reference", "Stability AI — REST API"),
            link("https://www.anthropic.com/", "Anthropic — Claude"),
            link("https://www.edenai.co/", "Eden AI — Unified API"),
        ],
        writeup: vec![
            item(
                "context",
                "1) Organization / Industry Context",
                "Our project focuses on AI API Integrators: platforms that unify and simplify access to AI APIs across providers (text, vision, speech). Model options are exploding while pricing, latency, and quality vary widely. Integrators normalize access, metrics, and billing.",
            ),
            item(
                "focus",
                "2) Digital / AI Focus",
                "An AI-enabled digital transformation project: a single integration layer to experiment with NLP, translation, computer vision and more, with orchestration that benchmarks providers and chooses the best option per call.",
            ),
            item(
                "strategy",
                "3) Strategic Aim",
                "External: help businesses embed generative AI, automation, and analytics via a unified interface with no vendor lock-in. Internal: reduce developer friction and time-to-market by simplifying auth, billing, and monitoring.",
            ),
            item(
                "goal",
                "4) Project Goal (1 sentence)",
                "We aim to enable rapid, cost-effective digital innovation and new AI-driven business models by integrating diverse AI APIs into a single, scalable platform that automates model selection and performance benchmarking.",
            ),
        ],
        business_models: vec![
            "Usage-based, tiered plans; vertical bundles (healthcare, education) with compliance presets.".to_string(),
            "AI performance marketplace: benchmark → route → monetize.".to_string(),
            "No vendor lock-in: swap providers as pricing/quality/latency shift.".to_string(),
            "Edge routing".to_string(),
        ],
        team: [
            "James McNamee",
            "Laurie Byrne",
            "Fiachra Tobin",
            "Micheal Buckley",
            "Ash Tirou",
            "Natalia Sulatska",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}
