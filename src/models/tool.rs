use serde::Serialize;

/// An entry of the HR tool dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub title: &'static str,
    pub description: &'static str,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

const fn planned(title: &'static str, description: &'static str) -> Tool {
    Tool { title, description, ready: false, url: None }
}

pub fn catalogue() -> Vec<Tool> {
    vec![
        planned(
            "Planos de Desenvolvimento Personalizados",
            "A IA automatiza a análise das avaliações de desempenho dos funcionários, das metas da empresa e do feedback para gerar um Plano de Desenvolvimento Individual (PDI) personalizado para cada funcionário.",
        ),
        planned(
            "Resolução de Conflitos nas Relações de Trabalho",
            "Um assistente de IA analisa reclamações e interpreta o contexto dos conflitos para sugerir resoluções com base nas diretrizes da empresa e nas melhores práticas de gestão.",
        ),
        planned(
            "Recrutamento e Seleção Aprimorados",
            "Usando o método de contratação 'Quem', a IA cria um scorecard para vagas de emprego, automatiza a análise de currículos e gera perguntas de entrevista personalizadas, auxiliando no processo de seleção.",
        ),
        planned(
            "Gestão de Avaliação de Desempenho",
            "A IA fornece modelos de avaliação de desempenho, sugestões de feedback construtivo e planos de desenvolvimento, ajudando a gerenciar o desempenho dos funcionários de forma eficaz.",
        ),
        planned(
            "Benefícios Personalizados para Funcionários",
            "A IA auxilia na análise e criação de pacotes de benefícios personalizados, considerando as necessidades e preferências dos funcionários para melhor satisfação e retenção.",
        ),
        planned(
            "Programas de Bem-Estar no Local de Trabalho",
            "A IA recomenda iniciativas para o bem-estar no local de trabalho, incluindo programas de saúde mental e atividades de equilíbrio entre vida pessoal e profissional para melhorar o bem-estar dos funcionários.",
        ),
        planned(
            "Processo de Integração Simplificados",
            "A IA fornece orientação para a criação de programas de integração eficazes, garantindo que os novos funcionários tenham o treinamento e a documentação necessários para um início tranquilo.",
        ),
        Tool {
            title: "Automação de Offboarding Perspicaz",
            description: "Sistemas automatizados processam entrevistas de saída, identificam os principais motivos da saída e geram insights acionáveis para que o RH melhore a retenção.",
            ready: true,
            url: Some("/offboarding"),
        },
    ]
}
