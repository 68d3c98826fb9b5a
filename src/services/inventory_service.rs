// src/services/inventory_service.rs

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{inventory_repo::LoteComAlimento, InventoryRepository},
    models::inventory::{
        AlertaLoteItem, AlertasLotes, Alimento, LoteVencendo, MovimentacaoCriada,
        MovimentacaoDetalhada, TipoMovimentacao, Urgencia, UsarQrResponse, ValidarQrResponse,
    },
};

// ---
// Regras puras do livro-razão
// ---

// Calcula o estoque resultante de uma movimentação.
// entrada soma, saida subtrai (sem deixar negativo), ajuste define o valor
// absoluto — a contagem física vira o novo estoque, com o snapshot
// anterior/novo preservado na própria movimentação.
pub fn aplicar_movimentacao(
    tipo: TipoMovimentacao,
    quantidade_anterior: Decimal,
    quantidade: Decimal,
) -> Result<Decimal, AppError> {
    if quantidade < Decimal::ZERO {
        return Err(AppError::RegraDeNegocio(
            "A quantidade não pode ser negativa".to_string(),
        ));
    }
    match tipo {
        TipoMovimentacao::Entrada => Ok(quantidade_anterior + quantidade),
        TipoMovimentacao::Saida => {
            if quantidade > quantidade_anterior {
                Err(AppError::EstoqueInsuficiente)
            } else {
                Ok(quantidade_anterior - quantidade)
            }
        }
        TipoMovimentacao::Ajuste => Ok(quantidade),
    }
}

// Consumo de lote via QR: devolve a nova quantidade_usada, rejeitando
// qualquer pedido acima do que resta no lote.
pub fn consumir_lote(
    quantidade: Decimal,
    quantidade_usada: Decimal,
    pedida: Decimal,
) -> Result<Decimal, AppError> {
    if pedida <= Decimal::ZERO {
        return Err(AppError::RegraDeNegocio(
            "A quantidade usada deve ser maior que zero".to_string(),
        ));
    }
    let disponivel = quantidade - quantidade_usada;
    if pedida > disponivel {
        return Err(AppError::QuantidadeIndisponivel(format!(
            "Quantidade indisponível no lote. Disponível: {}",
            disponivel
        )));
    }
    Ok(quantidade_usada + pedida)
}

pub fn classificar_urgencia(dias_restantes: i64) -> Urgencia {
    if dias_restantes <= 1 {
        Urgencia::Critico
    } else if dias_restantes <= 3 {
        Urgencia::Alto
    } else {
        Urgencia::Medio
    }
}

pub fn status_validade(data_validade: NaiveDate, hoje: NaiveDate) -> &'static str {
    if data_validade < hoje {
        "vencido"
    } else if (data_validade - hoje).num_days() <= 3 {
        "vencendo"
    } else {
        "valido"
    }
}

// Número legível impresso na etiqueta, junto do QR.
fn gerar_numero_lote(data_producao: NaiveDate) -> String {
    let sufixo = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        data_producao.format("%Y%m%d"),
        sufixo[..6].to_uppercase()
    )
}

pub struct NovaMovimentacao<'a> {
    pub alimento_id: Uuid,
    pub tipo: TipoMovimentacao,
    pub quantidade: Decimal,
    pub observacao: Option<&'a str>,
    pub data_producao: Option<NaiveDate>,
    pub data_validade: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self {
            inventory_repo,
            pool,
        }
    }

    // ---
    // Alimentos
    // ---

    pub async fn listar_alimentos(
        &self,
        restaurante_id: Uuid,
        categoria: Option<&str>,
        busca: Option<&str>,
    ) -> Result<Vec<Alimento>, AppError> {
        self.inventory_repo
            .listar_alimentos(&self.pool, restaurante_id, categoria, busca)
            .await
    }

    pub async fn buscar_alimento(
        &self,
        restaurante_id: Uuid,
        id: Uuid,
    ) -> Result<Alimento, AppError> {
        self.inventory_repo
            .buscar_alimento(&self.pool, restaurante_id, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Alimento"))
    }

    pub async fn criar_alimento(
        &self,
        restaurante_id: Uuid,
        nome: &str,
        categoria: Option<&str>,
        unidade_medida: Option<&str>,
        quantidade_minima: Decimal,
        tipo_embalagem: Option<&str>,
        unidades_por_embalagem: Option<Decimal>,
    ) -> Result<Alimento, AppError> {
        self.inventory_repo
            .criar_alimento(
                &self.pool,
                restaurante_id,
                nome,
                categoria,
                unidade_medida,
                quantidade_minima,
                tipo_embalagem,
                unidades_por_embalagem,
            )
            .await
    }

    pub async fn atualizar_alimento(
        &self,
        restaurante_id: Uuid,
        id: Uuid,
        nome: Option<&str>,
        categoria: Option<&str>,
        unidade_medida: Option<&str>,
        quantidade_minima: Option<Decimal>,
        tipo_embalagem: Option<&str>,
        unidades_por_embalagem: Option<Decimal>,
    ) -> Result<Alimento, AppError> {
        self.inventory_repo
            .atualizar_alimento(
                &self.pool,
                restaurante_id,
                id,
                nome,
                categoria,
                unidade_medida,
                quantidade_minima,
                tipo_embalagem,
                unidades_por_embalagem,
            )
            .await
    }

    pub async fn deletar_alimento(&self, restaurante_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.inventory_repo
            .deletar_alimento(&self.pool, restaurante_id, id)
            .await
    }

    // ---
    // Movimentações
    // ---

    // Registra a movimentação e aplica o novo estoque na mesma transação.
    // A linha do alimento fica travada (FOR UPDATE) até o commit, então
    // duas movimentações simultâneas do mesmo item serializam.
    pub async fn registrar_movimentacao(
        &self,
        restaurante_id: Uuid,
        usuario_id: Uuid,
        dados: NovaMovimentacao<'_>,
    ) -> Result<MovimentacaoCriada, AppError> {
        let mut tx = self.pool.begin().await?;

        let alimento = self
            .inventory_repo
            .buscar_alimento_para_atualizacao(&mut *tx, restaurante_id, dados.alimento_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Produto"))?;

        let quantidade_anterior = alimento.quantidade_estoque;
        let quantidade_nova =
            aplicar_movimentacao(dados.tipo, quantidade_anterior, dados.quantidade)?;

        let movimentacao = self
            .inventory_repo
            .inserir_movimentacao(
                &mut *tx,
                restaurante_id,
                dados.alimento_id,
                usuario_id,
                dados.tipo,
                dados.quantidade,
                quantidade_anterior,
                quantidade_nova,
                dados.observacao,
                None,
                dados.data_producao,
                dados.data_validade,
            )
            .await?;

        self.inventory_repo
            .atualizar_estoque(&mut *tx, dados.alimento_id, quantidade_nova)
            .await?;

        // Entrada com produção + validade emite um lote rastreável por QR
        let qr_code_gerado = match (dados.tipo, dados.data_producao, dados.data_validade) {
            (TipoMovimentacao::Entrada, Some(producao), Some(validade)) => {
                let qr_code = Uuid::new_v4().to_string();
                let lote_numero = gerar_numero_lote(producao);
                self.inventory_repo
                    .inserir_lote(
                        &mut *tx,
                        restaurante_id,
                        dados.alimento_id,
                        movimentacao.id,
                        &lote_numero,
                        &qr_code,
                        dados.quantidade,
                        producao,
                        validade,
                    )
                    .await?;
                Some(qr_code)
            }
            _ => None,
        };

        tx.commit().await?;

        Ok(MovimentacaoCriada {
            message: "Movimentação registrada com sucesso".to_string(),
            movimentacao_id: movimentacao.id,
            qr_code_gerado,
        })
    }

    pub async fn listar_movimentacoes(
        &self,
        restaurante_id: Uuid,
        tipo: Option<TipoMovimentacao>,
        data_inicio: Option<chrono::DateTime<Utc>>,
        data_fim: Option<chrono::DateTime<Utc>>,
    ) -> Result<Vec<MovimentacaoDetalhada>, AppError> {
        self.inventory_repo
            .listar_movimentacoes(&self.pool, restaurante_id, tipo, data_inicio, data_fim)
            .await
    }

    // ---
    // Alertas de validade
    // ---

    pub async fn lotes_vencendo(
        &self,
        restaurante_id: Uuid,
        dias: i64,
        hoje: NaiveDate,
    ) -> Result<Vec<LoteVencendo>, AppError> {
        let limite = hoje + Duration::days(dias);
        let lotes = self
            .inventory_repo
            .listar_lotes_vencendo(&self.pool, restaurante_id, hoje, limite)
            .await?;

        Ok(lotes
            .into_iter()
            .map(|l| {
                let dias_restantes = (l.lote.data_validade - hoje).num_days();
                LoteVencendo {
                    id: l.lote.id,
                    alimento_id: l.lote.alimento_id,
                    alimento_nome: l.alimento_nome,
                    lote_numero: l.lote.lote_numero.clone(),
                    qr_code: l.lote.qr_code.clone(),
                    quantidade_disponivel: l.lote.quantidade_disponivel(),
                    unidade_medida: l.alimento_unidade,
                    data_validade: l.lote.data_validade,
                    dias_restantes,
                    urgencia: classificar_urgencia(dias_restantes),
                }
            })
            .collect())
    }

    pub async fn alertas_lotes(
        &self,
        restaurante_id: Uuid,
        dias: i64,
        hoje: NaiveDate,
    ) -> Result<AlertasLotes, AppError> {
        let limite = hoje + Duration::days(dias);

        fn mapear(l: LoteComAlimento) -> AlertaLoteItem {
            AlertaLoteItem {
                id: l.lote.id,
                alimento_id: l.lote.alimento_id,
                alimento_nome: l.alimento_nome,
                lote_numero: l.lote.lote_numero.clone(),
                data_validade: l.lote.data_validade,
                quantidade_disponivel: l.lote.quantidade_disponivel(),
                unidade_medida: l.alimento_unidade,
            }
        }

        let vencidos: Vec<_> = self
            .inventory_repo
            .listar_lotes_vencidos(&self.pool, restaurante_id, hoje)
            .await?
            .into_iter()
            .map(mapear)
            .collect();

        let vencendo: Vec<_> = self
            .inventory_repo
            .listar_lotes_vencendo(&self.pool, restaurante_id, hoje, limite)
            .await?
            .into_iter()
            .map(mapear)
            .collect();

        Ok(AlertasLotes {
            total_vencidos: vencidos.len(),
            total_vencendo: vencendo.len(),
            vencidos,
            vencendo,
        })
    }

    // ---
    // QR Code
    // ---

    // Somente leitura: valida o código e devolve os dados do lote.
    // Validade vencida NÃO invalida o código; o uso continua permitido e a
    // resposta carrega o aviso.
    pub async fn validar_qrcode(
        &self,
        restaurante_id: Uuid,
        qr_code: &str,
        hoje: NaiveDate,
    ) -> Result<ValidarQrResponse, AppError> {
        let lote = self
            .inventory_repo
            .buscar_lote_por_codigo(&self.pool, restaurante_id, qr_code)
            .await?;

        let Some(lote) = lote else {
            return Ok(ValidarQrResponse {
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
            });
        };

        let alimento = self
            .inventory_repo
            .buscar_alimento(&self.pool, restaurante_id, lote.alimento_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Alimento"))?;

        if lote.esgotado() {
            return Ok(ValidarQrResponse {
                valido: false,
                mensagem: "Este QR Code já foi totalmente utilizado".to_string(),
                movimentacao_id: Some(lote.movimentacao_id),
                lote_id: Some(lote.id),
                alimento_nome: Some(alimento.nome),
                quantidade: Some(lote.quantidade),
                quantidade_disponivel: Some(Decimal::ZERO),
                unidade_medida: alimento.unidade_medida,
                categoria: alimento.categoria,
                data_producao: Some(lote.data_producao),
                data_validade: Some(lote.data_validade),
                status_validade: Some(status_validade(lote.data_validade, hoje).to_string()),
                estado: Some(lote.estado()),
            });
        }

        let status = status_validade(lote.data_validade, hoje);
        let mensagem = if lote.vencido(hoje) {
            format!(
                "⚠️ ATENÇÃO: Produto VENCIDO desde {}",
                lote.data_validade.format("%d/%m/%Y")
            )
        } else {
            format!(
                "✓ {} - Lote {} | Validade: {} | Disponível: {} {}",
                alimento.nome,
                lote.lote_numero,
                lote.data_validade.format("%d/%m/%Y"),
                lote.quantidade_disponivel(),
                alimento.unidade_medida.as_deref().unwrap_or("un")
            )
        };

        Ok(ValidarQrResponse {
            valido: true,
            mensagem,
            movimentacao_id: Some(lote.movimentacao_id),
            lote_id: Some(lote.id),
            alimento_nome: Some(alimento.nome),
            quantidade: Some(lote.quantidade),
            quantidade_disponivel: Some(lote.quantidade_disponivel()),
            unidade_medida: alimento.unidade_medida,
            categoria: alimento.categoria,
            data_producao: Some(lote.data_producao),
            data_validade: Some(lote.data_validade),
            status_validade: Some(status.to_string()),
            estado: Some(lote.estado()),
        })
    }

    // Baixa via QR: consumo do lote + baixa do estoque + saída implícita no
    // livro-razão, tudo em UMA transação. O FOR UPDATE no lote serializa
    // scans concorrentes do mesmo código; sem ele, dois scans poderiam ler o
    // mesmo "disponível" e juntos estourar o lote.
    pub async fn usar_qrcode(
        &self,
        restaurante_id: Uuid,
        usuario_id: Uuid,
        qr_code: &str,
        quantidade_usada: Option<Decimal>,
    ) -> Result<UsarQrResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let lote = self
            .inventory_repo
            .buscar_lote_por_codigo_para_atualizacao(&mut *tx, restaurante_id, qr_code)
            .await?
            .ok_or(AppError::NaoEncontrado("QR Code"))?;

        if lote.esgotado() {
            return Err(AppError::QuantidadeIndisponivel(
                "Este QR Code já foi totalmente utilizado".to_string(),
            ));
        }

        // Sem quantidade informada, consome tudo o que resta no lote
        let pedida = quantidade_usada.unwrap_or_else(|| lote.quantidade_disponivel());
        let nova_usada = consumir_lote(lote.quantidade, lote.quantidade_usada, pedida)?;

        let alimento = self
            .inventory_repo
            .buscar_alimento_para_atualizacao(&mut *tx, restaurante_id, lote.alimento_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Alimento"))?;

        let estoque_anterior = alimento.quantidade_estoque;
        if estoque_anterior < pedida {
            return Err(AppError::EstoqueInsuficiente);
        }
        let estoque_novo = estoque_anterior - pedida;

        let lote_atualizado = self
            .inventory_repo
            .registrar_consumo_lote(&mut *tx, lote.id, nova_usada)
            .await?;

        self.inventory_repo
            .atualizar_estoque(&mut *tx, alimento.id, estoque_novo)
            .await?;

        let movimentacao = self
            .inventory_repo
            .inserir_movimentacao(
                &mut *tx,
                restaurante_id,
                alimento.id,
                usuario_id,
                TipoMovimentacao::Saida,
                pedida,
                estoque_anterior,
                estoque_novo,
                Some("Baixa via QR Code scanner"),
                Some(qr_code),
                None,
                None,
            )
            .await?;

        tx.commit().await?;

        let mut mensagem = format!(
            "✓ Baixa realizada com sucesso! Produto: {} | Usado: {} {} | Restante no lote: {}",
            alimento.nome,
            pedida,
            alimento.unidade_medida.as_deref().unwrap_or("un"),
            lote_atualizado.quantidade_disponivel()
        );
        if lote_atualizado.esgotado() {
            mensagem.push_str(" | ⚠️ Lote completamente utilizado!");
        }

        Ok(UsarQrResponse {
            sucesso: true,
            mensagem,
            produto: alimento.nome,
            quantidade_baixa: pedida,
            quantidade_restante: lote_atualizado.quantidade_disponivel(),
            estoque_anterior,
            estoque_novo,
            movimentacao_id: movimentacao.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::{EstadoLote, Lote};
    use chrono::TimeZone;

    fn d(valor: i64) -> Decimal {
        Decimal::from(valor)
    }

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn lote_de_teste(quantidade: Decimal, usada: Decimal) -> Lote {
        Lote {
            id: Uuid::new_v4(),
            restaurante_id: Uuid::new_v4(),
            alimento_id: Uuid::new_v4(),
            movimentacao_id: Uuid::new_v4(),
            lote_numero: "20250101ABCDEF".to_string(),
            qr_code: Uuid::new_v4().to_string(),
            quantidade,
            quantidade_usada: usada,
            data_producao: data(2025, 1, 1),
            data_validade: data(2025, 1, 10),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    // ---
    // Aritmética do livro-razão
    // ---

    #[test]
    fn entrada_soma_ao_estoque() {
        let nova = aplicar_movimentacao(TipoMovimentacao::Entrada, d(10), d(20)).unwrap();
        assert_eq!(nova, d(30));
    }

    #[test]
    fn saida_subtrai_do_estoque() {
        let nova = aplicar_movimentacao(TipoMovimentacao::Saida, d(10), d(4)).unwrap();
        assert_eq!(nova, d(6));
    }

    #[test]
    fn saida_maior_que_estoque_e_rejeitada() {
        let err = aplicar_movimentacao(TipoMovimentacao::Saida, d(3), d(5));
        assert!(matches!(err, Err(AppError::EstoqueInsuficiente)));
    }

    #[test]
    fn saida_pode_zerar_o_estoque() {
        let nova = aplicar_movimentacao(TipoMovimentacao::Saida, d(5), d(5)).unwrap();
        assert_eq!(nova, Decimal::ZERO);
    }

    #[test]
    fn ajuste_define_o_valor_absoluto() {
        // Contagem física substitui o estoque, para cima ou para baixo
        assert_eq!(
            aplicar_movimentacao(TipoMovimentacao::Ajuste, d(10), d(7)).unwrap(),
            d(7)
        );
        assert_eq!(
            aplicar_movimentacao(TipoMovimentacao::Ajuste, d(2), d(50)).unwrap(),
            d(50)
        );
    }

    #[test]
    fn quantidade_negativa_e_rejeitada() {
        let err = aplicar_movimentacao(TipoMovimentacao::Entrada, d(10), d(-1));
        assert!(matches!(err, Err(AppError::RegraDeNegocio(_))));
    }

    // ---
    // Consumo de lote
    // ---

    #[test]
    fn consumo_parcial_acumula() {
        let usada = consumir_lote(d(20), Decimal::ZERO, d(8)).unwrap();
        assert_eq!(usada, d(8));

        // quantidade_usada nunca diminui
        let usada = consumir_lote(d(20), usada, d(5)).unwrap();
        assert_eq!(usada, d(13));
    }

    #[test]
    fn consumo_pode_esgotar_exatamente() {
        let usada = consumir_lote(d(20), d(13), d(7)).unwrap();
        assert_eq!(usada, d(20));
    }

    #[test]
    fn consumo_acima_do_disponivel_e_rejeitado() {
        let err = consumir_lote(d(20), d(15), d(6));
        assert!(matches!(err, Err(AppError::QuantidadeIndisponivel(_))));
    }

    #[test]
    fn consumo_zero_e_rejeitado() {
        let err = consumir_lote(d(20), d(0), Decimal::ZERO);
        assert!(matches!(err, Err(AppError::RegraDeNegocio(_))));
    }

    #[test]
    fn estados_do_lote() {
        assert_eq!(lote_de_teste(d(20), d(0)).estado(), EstadoLote::Active);
        assert_eq!(
            lote_de_teste(d(20), d(8)).estado(),
            EstadoLote::PartiallyUsed
        );

        let esgotado = lote_de_teste(d(20), d(20));
        assert_eq!(esgotado.estado(), EstadoLote::Exhausted);
        assert!(esgotado.esgotado());
        assert_eq!(esgotado.quantidade_disponivel(), Decimal::ZERO);
    }

    #[test]
    fn lote_esgotado_nao_aceita_mais_consumo() {
        let lote = lote_de_teste(d(20), d(20));
        let err = consumir_lote(lote.quantidade, lote.quantidade_usada, d(1));
        assert!(matches!(err, Err(AppError::QuantidadeIndisponivel(_))));
    }

    // ---
    // Urgência e validade
    // ---

    #[test]
    fn urgencia_por_dias_restantes() {
        assert_eq!(classificar_urgencia(0), Urgencia::Critico);
        assert_eq!(classificar_urgencia(1), Urgencia::Critico);
        assert_eq!(classificar_urgencia(2), Urgencia::Alto);
        assert_eq!(classificar_urgencia(3), Urgencia::Alto);
        assert_eq!(classificar_urgencia(4), Urgencia::Medio);
    }

    #[test]
    fn lote_de_arroz_vencendo_em_tres_dias_e_alto() {
        // Entrada de 20kg em 01/01 com validade 10/01; consulta em 07/01
        let hoje = data(2025, 1, 7);
        let validade = data(2025, 1, 10);

        let dias_restantes = (validade - hoje).num_days();
        assert_eq!(dias_restantes, 3);
        assert_eq!(classificar_urgencia(dias_restantes), Urgencia::Alto);
    }

    #[test]
    fn status_de_validade() {
        let hoje = data(2025, 1, 7);
        assert_eq!(status_validade(data(2025, 1, 6), hoje), "vencido");
        assert_eq!(status_validade(data(2025, 1, 7), hoje), "vencendo");
        assert_eq!(status_validade(data(2025, 1, 10), hoje), "vencendo");
        assert_eq!(status_validade(data(2025, 1, 20), hoje), "valido");
    }

    #[test]
    fn numero_de_lote_carrega_a_data_de_producao() {
        let numero = gerar_numero_lote(data(2026, 2, 1));
        assert!(numero.starts_with("20260201"));
        assert_eq!(numero.len(), 8 + 6);
    }
}
