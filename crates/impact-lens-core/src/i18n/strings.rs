use super::Language;

/// Translated panel strings
#[derive(Debug)]
pub struct Strings {
    pub analyze: &'static str,
    pub analyzing: &'static str,
    pub main_claim: &'static str,
    pub impact_summary: &'static str,
    pub critical_questions: &'static str,
    pub no_content: &'static str,
    pub usage: &'static str,
    pub upgrade: &'static str,
    pub limit_reached: &'static str,
    pub limit_reached_text: &'static str,
    pub upgrade_to_premium: &'static str,
    pub premium_benefits: &'static str,
    pub premium_account: &'static str,
    pub unlimited_analyses: &'static str,
    pub manage: &'static str,
    pub answer: &'static str,
    pub question_not_answered: &'static str,
    pub sources: &'static str,
    pub no_claim: &'static str,
    pub insufficient_content: &'static str,
}

static DUTCH: Strings = Strings {
    analyze: "Analyseer artikel",
    analyzing: "Analyseren...",
    main_claim: "Hoofdclaim",
    impact_summary: "Impact samenvatting",
    critical_questions: "Kritische vragen",
    no_content: "Ga naar een nieuwsartikel om te beginnen met analyseren.",
    usage: "gebruikt",
    upgrade: "Upgrade voor meer",
    limit_reached: "Limiet bereikt!",
    limit_reached_text: "Je hebt je 5 gratis analyses gebruikt deze maand.",
    upgrade_to_premium: "Upgrade naar Premium - €5/maand",
    premium_benefits: "Onbeperkte analyses + prioriteit support",
    premium_account: "Premium Account",
    unlimited_analyses: "Onbeperkte analyses",
    manage: "Beheren",
    answer: "Antwoord",
    question_not_answered: "Deze vraag werd niet beantwoord in de analyse",
    sources: "Bronnen",
    no_claim: "Geen claim gevonden",
    insufficient_content: "Geen voldoende inhoud gevonden op deze pagina",
};

static ENGLISH: Strings = Strings {
    analyze: "Analyze Article",
    analyzing: "Analyzing...",
    main_claim: "Main Claim",
    impact_summary: "Impact Summary",
    critical_questions: "Critical Questions",
    no_content: "Navigate to a news article to start analyzing.",
    usage: "used",
    upgrade: "Upgrade for more",
    limit_reached: "Limit Reached!",
    limit_reached_text: "You have used your 5 free analyses for this month.",
    upgrade_to_premium: "Upgrade to Premium - €5/month",
    premium_benefits: "Unlimited analyses + priority support",
    premium_account: "Premium Account",
    unlimited_analyses: "Unlimited analyses",
    manage: "Manage",
    answer: "Answer",
    question_not_answered: "This question was not answered in the analysis",
    sources: "Sources",
    no_claim: "No claim found",
    insufficient_content: "Not enough content found on this page",
};

static GERMAN: Strings = Strings {
    analyze: "Artikel analysieren",
    analyzing: "Analysiere...",
    main_claim: "Hauptanspruch",
    impact_summary: "Auswirkungszusammenfassung",
    critical_questions: "Kritische Fragen",
    no_content: "Gehen Sie zu einem Nachrichtenartikel, um die Analyse zu starten.",
    usage: "verwendet",
    upgrade: "Upgrade für mehr",
    limit_reached: "Limit erreicht!",
    limit_reached_text: "Sie haben Ihre 5 kostenlosen Analysen für diesen Monat aufgebraucht.",
    upgrade_to_premium: "Upgrade auf Premium - 5 €/Monat",
    premium_benefits: "Unbegrenzte Analysen + Prioritätssupport",
    premium_account: "Premium-Konto",
    unlimited_analyses: "Unbegrenzte Analysen",
    manage: "Verwalten",
    answer: "Antwort",
    question_not_answered: "Diese Frage wurde in der Analyse nicht beantwortet",
    sources: "Quellen",
    no_claim: "Kein Anspruch gefunden",
    insufficient_content: "Nicht genügend Inhalt auf dieser Seite gefunden",
};

static SPANISH: Strings = Strings {
    analyze: "Analizar artículo",
    analyzing: "Analizando...",
    main_claim: "Reclamación principal",
    impact_summary: "Resumen de impacto",
    critical_questions: "Preguntas críticas",
    no_content: "Vaya a un artículo de noticias para comenzar a analizar.",
    usage: "usado",
    upgrade: "Actualizar para más",
    limit_reached: "¡Límite alcanzado!",
    limit_reached_text: "Ha utilizado sus 5 análisis gratuitos de este mes.",
    upgrade_to_premium: "Actualizar a Premium - 5 €/mes",
    premium_benefits: "Análisis ilimitados + soporte prioritario",
    premium_account: "Cuenta Premium",
    unlimited_analyses: "Análisis ilimitados",
    manage: "Gestionar",
    answer: "Respuesta",
    question_not_answered: "Esta pregunta no fue respondida en el análisis",
    sources: "Fuentes",
    no_claim: "No se encontró ninguna reclamación",
    insufficient_content: "No se encontró suficiente contenido en esta página",
};

pub(super) fn for_language(language: Language) -> &'static Strings {
    match language {
        Language::Dutch => &DUTCH,
        Language::English => &ENGLISH,
        Language::German => &GERMAN,
        Language::Spanish => &SPANISH,
    }
}
