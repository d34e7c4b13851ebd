/// The fixed instruction sent to the model for every reading.
pub const FORTUNE_PROMPT: &str = r#"Generate a detailed fortune cookie response in JSON format with the following fields:
1. message: A short, insightful fortune cookie message (under 100 characters)
2. interpretation: A brief explanation of what this fortune means (1-2 sentences)
3. luckyNumbers: 3-5 lucky numbers separated by commas
4. luckyColor: A color that will bring good fortune
5. luckyElement: One of the five Chinese elements (Wood, Fire, Earth, Metal, Water)
6. timeframe: When this fortune is most relevant (e.g., "Coming week", "Next month", "This season")

Make the fortune sound authentic, mystical and positive. Format the response as valid JSON."#;
