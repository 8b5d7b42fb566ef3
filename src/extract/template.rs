//! Prompt Templates
//!
//! Prompt text per analysis type and the layout of a rendered artifact.

use crate::models::{AnalysisType, VideoId};

const RULE: &str = "============================================================";
const THIN_RULE: &str = "----------------------------------------";
const TRANSCRIPT_HEADING: &str = "Full video transcript:";

// == Prompt Templates ==
/// Prompt text placed in front of the transcript.
pub fn prompt_template(analysis: AnalysisType) -> &'static str {
    match analysis {
        AnalysisType::Summary => {
            "YouTube video smart summary

Summarize the video transcript below.

1. Core points (3-5): one or two sentences each, rated by importance (*** high, ** medium, * low)
2. Key insights and the reasoning or evidence behind them
3. Practical value: how a viewer can apply this, and how feasible it is
4. Target audience and the background knowledge they need
5. Quality rating: accuracy (A/B/C/D), depth (deep/medium/basic), usefulness (1-10)

Answer in a clear, structured format."
        }
        AnalysisType::Analysis => {
            "YouTube video in-depth analysis

Analyze the video transcript below as a domain expert.

1. Thesis and overall argument structure
2. Evidence quality for each major claim
3. Logical gaps, fallacies or unstated assumptions
4. Comparison with competing views in the field
5. Concrete suggestions to strengthen the argument"
        }
        AnalysisType::Questions => {
            "YouTube video study questions

Write study questions about the video transcript below, grouped by level.

1. Recall: facts and definitions stated in the video
2. Understanding: explain the ideas in your own words
3. Application: use the ideas in a new situation
4. Analysis and evaluation: compare, critique, justify
5. Extension: open questions the video leaves unanswered

Add a short hint for every question above level 2."
        }
        AnalysisType::Translation => {
            "YouTube video polished translation

Produce a clean, fluent translation of the video transcript below.

1. Fix speech-to-text errors and filler words before translating
2. Keep the speaker's tone and intent
3. List technical terms with the original and translated form side by side
4. Adapt idioms and cultural references, noting each adaptation"
        }
        AnalysisType::Mindmap => {
            "YouTube video mind map outline

Turn the video transcript below into a mind map outline.

1. One central topic
2. 4-7 main branches, each with 2-5 sub-branches
3. Keywords only, no full sentences
4. Mark cross-links between branches
5. Suggest an icon or colour per branch to aid recall

Use nested Markdown bullet lists."
        }
        AnalysisType::HistoricalVerification => {
            "YouTube video historical data check

Check the claims in the video transcript below against the historical record.

1. List every dated event, statistic or historical claim
2. For each: what the record shows, with likely sources
3. Flag discrepancies and rate each claim (verified / partly true / unsupported / false)
4. Overall credibility grade for the video"
        }
        AnalysisType::TrendAnalysis => {
            "YouTube video trend analysis

Identify the trends discussed in the video transcript below.

1. Trends named or implied, with their drivers
2. Current stage of each trend and supporting signals
3. Opportunities and risks for individuals and businesses
4. Signals to watch that would confirm or refute each trend"
        }
        AnalysisType::FuturePrediction => {
            "YouTube video future scenarios

Build forecasts from the ideas in the video transcript below.

1. Key uncertainties that shape the future of this topic
2. Three scenarios: optimistic, baseline, pessimistic
3. Timeline for each scenario (1 year, 3 years, 10 years)
4. Early warning indicators
5. Recommended actions for each scenario"
        }
        AnalysisType::IndustryInsight => {
            "YouTube video industry insight

Analyze the video transcript below from an industry perspective.

1. Industry and value-chain position of the subject
2. Market size, competitors and competitive dynamics
3. Business model and how it makes money
4. Regulatory and technology factors
5. Investment or strategy takeaways"
        }
        AnalysisType::FactCheck => {
            "YouTube video fact-check report

Fact-check the video transcript below.

1. Extract every checkable claim and classify it (statistic, quote, causal claim, prediction, opinion)
2. For each factual claim: verdict (true / mostly true / misleading / false / unverifiable) and reasoning
3. Sources a reader could use to verify it
4. Summary of the video's overall reliability"
        }
    }
}

// == Artifact Layout ==
/// Lays out the final artifact: video header, prompt, then transcript.
pub fn render_artifact(
    video: &VideoId,
    reference: &str,
    analysis: AnalysisType,
    cleaned_transcript: &str,
) -> String {
    format!(
        "Video title: YouTube Video {id}\n\
         Video ID: {id}\n\
         Video URL: {reference}\n\
         {RULE}\n\
         \n\
         AI analysis prompt ({analysis}):\n\
         {THIN_RULE}\n\
         {prompt}\n\
         \n\
         {RULE}\n\
         \n\
         {TRANSCRIPT_HEADING}\n\
         {THIN_RULE}\n\
         {cleaned_transcript}",
        id = video,
        prompt = prompt_template(analysis),
    )
}

/// The transcript part of a rendered artifact, or the whole text when the
/// layout is not recognised.
pub fn transcript_section(artifact: &str) -> &str {
    let marker = format!("{TRANSCRIPT_HEADING}\n{THIN_RULE}\n");
    artifact
        .split_once(marker.as_str())
        .map(|(_, transcript)| transcript)
        .unwrap_or(artifact)
}
