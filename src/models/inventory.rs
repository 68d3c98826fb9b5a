// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Alimento (item de estoque)
// ---
// O estoque atual (quantidade_estoque) só muda via movimentações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Alimento {
    pub id: Uuid,
    pub restaurante_id: Uuid,
    pub nome: String,
    pub categoria: Option<String>,
    pub unidade_medida: Option<String>,
    pub quantidade_estoque: Decimal,
    pub quantidade_minima: Decimal,

    // Embalagem opcional: "caixa com 12", "fardo com 6"...
    pub tipo_embalagem: Option<String>,
    pub unidades_por_embalagem: Option<Decimal>,

    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Movimentações de estoque (livro-razão, append-only)
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_movimentacao", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Entrada,
    Saida,
    Ajuste,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Movimentacao {
    pub id: Uuid,
    pub restaurante_id: Uuid,
    pub alimento_id: Uuid,
    pub usuario_id: Uuid,
    pub tipo: TipoMovimentacao,
    pub quantidade: Decimal,
    pub quantidade_anterior: Decimal,
    pub quantidade_nova: Decimal,
    pub observacao: Option<String>,
    pub qr_code_usado: Option<String>,
    pub data_producao: Option<NaiveDate>,
    pub data_validade: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// Linha do histórico enriquecida com nome do alimento/usuário para exibição.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MovimentacaoDetalhada {
    pub id: Uuid,
    pub alimento_id: Uuid,
    pub alimento_nome: String,
    pub tipo: TipoMovimentacao,
    pub quantidade: Decimal,
    pub quantidade_anterior: Decimal,
    pub quantidade_nova: Decimal,
    pub usuario_nome: String,
    pub observacao: Option<String>,
    pub unidade_medida: Option<String>,
    pub data_hora: DateTime<Utc>,
    pub qr_code_gerado: Option<String>,
    pub data_producao: Option<NaiveDate>,
    pub data_validade: Option<NaiveDate>,
    pub usado: Option<bool>,
}

// Resposta do POST .../movimentacoes
#[derive(Debug, Serialize, ToSchema)]
pub struct MovimentacaoCriada {
    pub message: String,
    pub movimentacao_id: Uuid,
    pub qr_code_gerado: Option<String>,
}

// ---
// 3. Lote (QR batch)
// ---
// Emitido junto com uma entrada que informa produção + validade.
// Nunca é deletado individualmente: registro histórico.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoLote {
    Active,
    PartiallyUsed,
    Exhausted,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Lote {
    pub id: Uuid,
    pub restaurante_id: Uuid,
    pub alimento_id: Uuid,
    pub movimentacao_id: Uuid,
    pub lote_numero: String,
    pub qr_code: String,
    pub quantidade: Decimal,
    pub quantidade_usada: Decimal,
    pub data_producao: NaiveDate,
    pub data_validade: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Lote {
    pub fn quantidade_disponivel(&self) -> Decimal {
        self.quantidade - self.quantidade_usada
    }

    pub fn esgotado(&self) -> bool {
        self.quantidade_usada >= self.quantidade
    }

    pub fn estado(&self) -> EstadoLote {
        if self.esgotado() {
            EstadoLote::Exhausted
        } else if self.quantidade_usada > Decimal::ZERO {
            EstadoLote::PartiallyUsed
        } else {
            EstadoLote::Active
        }
    }

    // Validade vencida não bloqueia o uso: é apenas informativa.
    pub fn vencido(&self, hoje: NaiveDate) -> bool {
        self.data_validade < hoje
    }
}

// ---
// 4. Alertas de validade
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgencia {
    Critico,
    Alto,
    Medio,
}

// Lote anotado com dias restantes e urgência, para o alerta da cozinha.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoteVencendo {
    pub id: Uuid,
    pub alimento_id: Uuid,
    pub alimento_nome: String,
    pub lote_numero: String,
    pub qr_code: String,
    pub quantidade_disponivel: Decimal,
    pub unidade_medida: Option<String>,
    pub data_validade: NaiveDate,
    pub dias_restantes: i64,
    pub urgencia: Urgencia,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertaLoteItem {
    pub id: Uuid,
    pub alimento_id: Uuid,
    pub alimento_nome: String,
    pub lote_numero: String,
    pub data_validade: NaiveDate,
    pub quantidade_disponivel: Decimal,
    pub unidade_medida: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertasLotes {
    pub vencidos: Vec<AlertaLoteItem>,
    pub vencendo: Vec<AlertaLoteItem>,
    pub total_vencidos: usize,
    pub total_vencendo: usize,
}

// ---
// 5. Respostas do fluxo de QR Code
// ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidarQrResponse {
    pub valido: bool,
    pub mensagem: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub movimentacao_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lote_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alimento_nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantidade: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantidade_disponivel: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unidade_medida: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_producao: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_validade: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_validade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoLote>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsarQrResponse {
    pub sucesso: bool,
    pub mensagem: String,
    pub produto: String,
    pub quantidade_baixa: Decimal,
    pub quantidade_restante: Decimal,
    pub estoque_anterior: Decimal,
    pub estoque_novo: Decimal,
    pub movimentacao_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Os painéis leem estas chaves pelo nome exato: qualquer rename aqui
    // quebra o front-end em silêncio.

    #[test]
    fn tipo_movimentacao_no_wire_e_minusculo() {
        assert_eq!(
            serde_json::to_value(TipoMovimentacao::Entrada).unwrap(),
            json!("entrada")
        );
        assert_eq!(
            serde_json::from_value::<TipoMovimentacao>(json!("saida")).unwrap(),
            TipoMovimentacao::Saida
        );
        assert_eq!(
            serde_json::from_value::<TipoMovimentacao>(json!("ajuste")).unwrap(),
            TipoMovimentacao::Ajuste
        );
    }

    #[test]
    fn urgencia_no_wire_e_minusculo() {
        assert_eq!(serde_json::to_value(Urgencia::Critico).unwrap(), json!("critico"));
        assert_eq!(serde_json::to_value(Urgencia::Alto).unwrap(), json!("alto"));
        assert_eq!(serde_json::to_value(Urgencia::Medio).unwrap(), json!("medio"));
    }

    #[test]
    fn estado_do_lote_segue_o_contrato() {
        assert_eq!(
            serde_json::to_value(EstadoLote::PartiallyUsed).unwrap(),
            json!("PARTIALLY_USED")
        );
    }

    #[test]
    fn lote_vencendo_carrega_dias_e_urgencia() {
        let lote = LoteVencendo {
            id: Uuid::nil(),
            alimento_id: Uuid::nil(),
            alimento_nome: "Arroz".to_string(),
            lote_numero: "20250101ABCDEF".to_string(),
            qr_code: "qr".to_string(),
            quantidade_disponivel: Decimal::from(20),
            unidade_medida: Some("kg".to_string()),
            data_validade: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            dias_restantes: 3,
            urgencia: Urgencia::Alto,
        };

        let valor = serde_json::to_value(&lote).unwrap();
        assert_eq!(valor["alimento_nome"], json!("Arroz"));
        assert_eq!(valor["dias_restantes"], json!(3));
        assert_eq!(valor["urgencia"], json!("alto"));
        assert_eq!(valor["data_validade"], json!("2025-01-10"));
    }

    #[test]
    fn validacao_negativa_omite_campos_do_lote() {
        let resposta = ValidarQrResponse {
            valido: false,
            mensagem: "QR Code não encontrado ou inválido".to_string(),
            movimentacao_id: None,
            lote_id: None,
            alimento_nome: None,
            quantidade: None,
            quantidade_disponivel: None,
            unidade_medida: None,
            categoria: None,
            data_producao: None,
            data_validade: None,
            status_validade: None,
            estado: None,
        };

        let valor = serde_json::to_value(&resposta).unwrap();
        assert_eq!(valor["valido"], json!(false));
        assert!(!valor["mensagem"].as_str().unwrap().is_empty());
        assert!(valor.get("alimento_nome").is_none());
    }

    #[test]
    fn resposta_de_movimentacao_expoe_qr_code_gerado() {
        let criada = MovimentacaoCriada {
            message: "Movimentação registrada com sucesso".to_string(),
            movimentacao_id: Uuid::nil(),
            qr_code_gerado: Some("abc-123".to_string()),
        };

        let valor = serde_json::to_value(&criada).unwrap();
        assert_eq!(valor["qr_code_gerado"], json!("abc-123"));
        assert_eq!(valor["movimentacao_id"], json!(Uuid::nil().to_string()));
    }
}
