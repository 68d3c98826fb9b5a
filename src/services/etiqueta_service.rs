// src/services/etiqueta_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::TipoMovimentacao,
};

// Gera a etiqueta em PDF (80x60mm, impressora térmica) de uma entrada
// com QR code emitido.
#[derive(Clone)]
pub struct EtiquetaService {
    inventory_repo: InventoryRepository,
}

impl EtiquetaService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    pub async fn gerar_etiqueta_pdf(
        &self,
        pool: &PgPool,
        restaurante_id: Uuid,
        movimentacao_id: Uuid,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os dados
        let movimentacao = self
            .inventory_repo
            .buscar_movimentacao(pool, restaurante_id, movimentacao_id)
            .await?
            .filter(|m| m.tipo == TipoMovimentacao::Entrada)
            .ok_or(AppError::NaoEncontrado("Movimentação de entrada"))?;

        let lote = self
            .inventory_repo
            .buscar_lote_da_movimentacao(pool, restaurante_id, movimentacao_id)
            .await?
            .ok_or_else(|| {
                AppError::RegraDeNegocio(
                    "Movimentação não possui QR code gerado".to_string(),
                )
            })?;

        let alimento = self
            .inventory_repo
            .buscar_alimento(pool, restaurante_id, movimentacao.alimento_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Alimento"))?;

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| {
                AppError::FonteNaoEncontrada("Fonte não encontrada na pasta ./fonts".to_string())
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Etiqueta - {}", alimento.nome));
        doc.set_paper_size(genpdf::Size::new(80.0, 60.0)); // Etiqueta 80x60mm

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(3);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO: nome do produto ---
        doc.push(
            elements::Paragraph::new(alimento.nome.chars().take(25).collect::<String>())
                .styled(style::Style::new().bold().with_font_size(11)),
        );

        doc.push(elements::Paragraph::new(format!(
            "Qtd: {} {}",
            movimentacao.quantidade,
            alimento.unidade_medida.as_deref().unwrap_or("un")
        )));

        doc.push(elements::Paragraph::new(format!(
            "Lote: {}",
            lote.lote_numero
        )));

        doc.push(elements::Paragraph::new(format!(
            "Prod: {}",
            lote.data_producao.format("%d/%m/%Y")
        )));

        // Validade em destaque (somente preto: impressora térmica)
        doc.push(
            elements::Paragraph::new(format!(
                "*** VAL: {} ***",
                lote.data_validade.format("%d/%m/%Y")
            ))
            .styled(style::Style::new().bold().with_font_size(9)),
        );

        if let Some(categoria) = &alimento.categoria {
            doc.push(
                elements::Paragraph::new(format!("Cat: {}", categoria))
                    .styled(style::Style::new().with_font_size(7)),
            );
        }

        doc.push(elements::Break::new(0.5));

        // --- QR CODE ---
        let code = QrCode::new(lote.qr_code.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        // Renderiza para imagem
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        // Converte para genpdf::Image
        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.4, 0.4));

        doc.push(pdf_image);

        // Token no rodapé, legível para conferência manual
        doc.push(
            elements::Paragraph::new(lote.qr_code.clone())
                .styled(style::Style::new().with_font_size(5)),
        );

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
