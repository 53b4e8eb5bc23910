use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

pub type ProjectId = String;

#[derive(Debug, Deserialize, Clone)]
pub struct Dataset {
    #[serde(rename = "projetos")]
    pub projects: Vec<Project>,
    #[serde(rename = "organizacoes")]
    pub organizations: BTreeMap<String, Organization>,
    #[serde(rename = "selos_editoriais")]
    pub seals: BTreeMap<String, EditorialSeal>,
    #[serde(rename = "metricas_performance")]
    pub metrics: Metrics,
    #[serde(rename = "analise_competitiva")]
    pub competitors: BTreeMap<String, Competitor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Project {
    pub id: ProjectId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_evento")]
    pub event_date: NaiveDate,
    #[serde(rename = "local")]
    pub location: String,
    #[serde(rename = "categoria")]
    pub category: String,
    pub status: String,
    pub osc: String,
    #[serde(rename = "cronograma")]
    pub schedule: Schedule,
    #[serde(rename = "responsaveis")]
    pub responsibles: BTreeMap<String, Vec<String>>,
    #[serde(rename = "conteudo_sugerido")]
    pub content: SuggestedContent,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Schedule {
    pub teaser: NaiveDate,
    pub countdown: NaiveDate,
    #[serde(rename = "evento")]
    pub event: NaiveDate,
    #[serde(rename = "agradecimentos")]
    pub thanks: NaiveDate,
    #[serde(rename = "impacto")]
    pub impact: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Teaser,
    Countdown,
    Event,
    Thanks,
    Impact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuggestedContent {
    #[serde(rename = "selo")]
    pub seal: String,
    pub hashtags: Vec<String>,
    pub cta: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Organization {
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorialSeal {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "proposito")]
    pub purpose: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Competitor {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "seguidores")]
    pub followers: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Metrics {
    #[serde(rename = "kpis_realize")]
    pub kpis: Kpis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Kpis {
    #[serde(rename = "reconhecimento_marca")]
    pub brand: BrandKpis,
    #[serde(rename = "engajamento")]
    pub engagement: EngagementKpis,
    pub website: WebsiteKpis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrandKpis {
    #[serde(rename = "alcance_mensal")]
    pub monthly_reach: u64,
    #[serde(rename = "impressoes_mensal")]
    pub monthly_impressions: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngagementKpis {
    #[serde(rename = "taxa_engajamento")]
    pub rate: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebsiteKpis {
    #[serde(rename = "visitantes_unicos")]
    pub unique_visitors: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("duplicate project id: {0}")]
    DuplicateProjectId(ProjectId),
    #[error("project {project} references unknown editorial seal: {seal}")]
    UnknownSeal { project: ProjectId, seal: String },
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Teaser,
        Phase::Countdown,
        Phase::Event,
        Phase::Thanks,
        Phase::Impact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Teaser => "Teaser / Release",
            Phase::Countdown => "Countdown",
            Phase::Event => "Event",
            Phase::Thanks => "Thanks",
            Phase::Impact => "Impact",
        }
    }
}

impl Schedule {
    pub fn date(&self, phase: Phase) -> NaiveDate {
        match phase {
            Phase::Teaser => self.teaser,
            Phase::Countdown => self.countdown,
            Phase::Event => self.event,
            Phase::Thanks => self.thanks,
            Phase::Impact => self.impact,
        }
    }

    pub fn phases(&self) -> [(Phase, NaiveDate); 5] {
        [
            (Phase::Teaser, self.teaser),
            (Phase::Countdown, self.countdown),
            (Phase::Event, self.event),
            (Phase::Thanks, self.thanks),
            (Phase::Impact, self.impact),
        ]
    }
}

impl Dataset {
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(DataError::DuplicateProjectId(project.id.clone()));
            }
            if !self.seals.contains_key(&project.content.seal) {
                return Err(DataError::UnknownSeal {
                    project: project.id.clone(),
                    seal: project.content.seal.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn organization_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.organizations
            .get(key)
            .map(|org| org.name.as_str())
            .unwrap_or(key)
    }

    pub fn seal(&self, key: &str) -> Option<&EditorialSeal> {
        self.seals.get(key)
    }

    pub fn organization_keys(&self) -> Vec<&str> {
        self.organizations.keys().map(String::as_str).collect()
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for project in &self.projects {
            if !categories.contains(&project.category.as_str()) {
                categories.push(project.category.as_str());
            }
        }
        categories
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            event_date: date(2025, 6, 15),
            location: "Centro Cultural de Santo André".to_string(),
            category: "Cultura".to_string(),
            status: "Planejamento".to_string(),
            osc: "apj".to_string(),
            schedule: Schedule {
                teaser: date(2025, 5, 20),
                countdown: date(2025, 6, 1),
                event: date(2025, 6, 15),
                thanks: date(2025, 6, 17),
                impact: date(2025, 7, 1),
            },
            responsibles: BTreeMap::from([
                (
                    "Design".to_string(),
                    vec!["Bianca Souza".to_string(), "Caio Martins".to_string()],
                ),
                (
                    "Redes Sociais".to_string(),
                    vec!["Larissa Prado".to_string()],
                ),
            ]),
            content: SuggestedContent {
                seal: "impacto_real".to_string(),
                hashtags: vec!["#Groove".to_string(), "#Evento".to_string()],
                cta: "Participe e compartilhe!".to_string(),
            },
        }
    }

    pub(crate) fn dataset(projects: Vec<Project>) -> Dataset {
        Dataset {
            projects,
            organizations: BTreeMap::from([
                (
                    "apj".to_string(),
                    Organization {
                        name: "APJ".to_string(),
                    },
                ),
                (
                    "criar".to_string(),
                    Organization {
                        name: "CRIAR".to_string(),
                    },
                ),
                (
                    "instituto_realize".to_string(),
                    Organization {
                        name: "Instituto Realize".to_string(),
                    },
                ),
            ]),
            seals: BTreeMap::from([
                (
                    "impacto_real".to_string(),
                    EditorialSeal {
                        name: "Impacto Real".to_string(),
                        color: "#B4413C".to_string(),
                        purpose: "Mostrar resultados concretos dos projetos.".to_string(),
                    },
                ),
                (
                    "groove_cultural".to_string(),
                    EditorialSeal {
                        name: "Groove Cultural".to_string(),
                        color: "#9B59B6".to_string(),
                        purpose: "Celebrar a produção artística das OSCs.".to_string(),
                    },
                ),
            ]),
            metrics: Metrics {
                kpis: Kpis {
                    brand: BrandKpis {
                        monthly_reach: 125_400,
                        monthly_impressions: 342_800,
                    },
                    engagement: EngagementKpis {
                        rate: "4.8%".to_string(),
                    },
                    website: WebsiteKpis {
                        unique_visitors: 18_250,
                    },
                },
            },
            competitors: BTreeMap::from([
                (
                    "onda_social".to_string(),
                    Competitor {
                        name: "Onda Social".to_string(),
                        followers: 45_200,
                    },
                ),
                (
                    "rede_bem".to_string(),
                    Competitor {
                        name: "Rede do Bem".to_string(),
                        followers: 38_900,
                    },
                ),
            ]),
        }
    }
}
