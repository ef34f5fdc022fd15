// src/services/inventario_service.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::InventarioRepository,
    models::inventario::{
        EstadoReserva, MovimientoInventario, Producto, Reserva, ReservaConProducto,
        TipoMovimiento,
    },
    models::usuario::Usuario,
};

#[derive(Clone)]
pub struct InventarioService {
    inventario_repo: InventarioRepository,
    pool: SqlitePool,
}

impl InventarioService {
    pub fn new(inventario_repo: InventarioRepository, pool: SqlitePool) -> Self {
        Self {
            inventario_repo,
            pool,
        }
    }

    // ---
    // Productos
    // ---

    pub async fn list_productos(&self) -> Result<Vec<Producto>, AppError> {
        self.inventario_repo.list_productos().await
    }

    // Alta con stock inicial: el stock entra como un movimiento 'entrada',
    // así la suma de movimientos reproduce el stock desde el día cero.
    pub async fn create_producto(
        &self,
        marca: &str,
        modelo: &str,
        medida: &str,
        precio_compra: f64,
        precio_venta: f64,
        stock_inicial: i64,
        stock_minimo: i64,
        proveedor: Option<&str>,
        actor: &Usuario,
    ) -> Result<Producto, AppError> {
        let mut tx = self.pool.begin().await?;

        let producto = self
            .inventario_repo
            .create_producto(
                &mut *tx,
                marca,
                modelo,
                medida,
                precio_compra,
                precio_venta,
                stock_inicial,
                stock_minimo,
                proveedor,
            )
            .await?;

        if stock_inicial > 0 {
            self.inventario_repo
                .insert_movimiento(
                    &mut *tx,
                    producto.id,
                    TipoMovimiento::Entrada,
                    stock_inicial,
                    Some(precio_compra),
                    Some("Stock inicial"),
                    actor.id,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!("🛞 Producto {} ({} {}) dado de alta", producto.id, marca, modelo);
        Ok(producto)
    }

    // Actualización parcial. Si viene `stock_actual`, la diferencia con el
    // stock vigente se registra como un movimiento 'ajuste': el stock nunca
    // cambia sin dejar rastro en el libro.
    pub async fn update_producto(
        &self,
        id: i64,
        marca: Option<String>,
        modelo: Option<String>,
        medida: Option<String>,
        precio_compra: Option<f64>,
        precio_venta: Option<f64>,
        stock_actual: Option<i64>,
        stock_minimo: Option<i64>,
        proveedor: Option<String>,
        actor: &Usuario,
    ) -> Result<Producto, AppError> {
        let mut tx = self.pool.begin().await?;

        let existente = self
            .inventario_repo
            .find_producto(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        let stock_vigente = existente.stock_actual;
        let marca_final = marca.unwrap_or(existente.marca);
        let modelo_final = modelo.unwrap_or(existente.modelo);
        let medida_final = medida.unwrap_or(existente.medida);
        let precio_compra_final = precio_compra.unwrap_or(existente.precio_compra);
        let precio_venta_final = precio_venta.unwrap_or(existente.precio_venta);
        let stock_minimo_final = stock_minimo.unwrap_or(existente.stock_minimo);
        let proveedor_final = proveedor.or(existente.proveedor);

        let mut producto = self
            .inventario_repo
            .update_producto(
                &mut *tx,
                id,
                &marca_final,
                &modelo_final,
                &medida_final,
                precio_compra_final,
                precio_venta_final,
                stock_minimo_final,
                proveedor_final.as_deref(),
            )
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        if let Some(stock_nuevo) = stock_actual {
            let delta = stock_nuevo - stock_vigente;
            if delta != 0 {
                producto = self
                    .inventario_repo
                    .ajustar_stock(&mut *tx, id, delta)
                    .await?
                    .ok_or(AppError::ProductoNotFound)?;

                self.inventario_repo
                    .insert_movimiento(
                        &mut *tx,
                        id,
                        TipoMovimiento::Ajuste,
                        delta,
                        None,
                        Some("Ajuste manual de stock"),
                        actor.id,
                    )
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(producto)
    }

    pub async fn delete_producto(&self, id: i64) -> Result<(), AppError> {
        let filas = self
            .inventario_repo
            .set_producto_inactivo(&self.pool, id)
            .await?;

        if filas == 0 {
            return Err(AppError::ProductoNotFound);
        }

        tracing::info!("🗑️ Producto {} dado de baja del catálogo", id);
        Ok(())
    }

    // ---
    // Movimientos
    // ---

    pub async fn list_movimientos(
        &self,
        producto_id: i64,
    ) -> Result<Vec<MovimientoInventario>, AppError> {
        self.inventario_repo
            .find_producto(&self.pool, producto_id)
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        self.inventario_repo.list_movimientos(producto_id).await
    }

    // Registra un movimiento y aplica su delta al stock en una transacción.
    pub async fn registrar_movimiento(
        &self,
        producto_id: i64,
        tipo: TipoMovimiento,
        cantidad: i64,
        precio_unitario: Option<f64>,
        motivo: Option<&str>,
        actor: &Usuario,
    ) -> Result<MovimientoInventario, AppError> {
        // Entrada, salida y devolución llevan una cantidad positiva; el
        // ajuste trae el delta con su signo (y cero no dice nada).
        match tipo {
            TipoMovimiento::Ajuste => {
                if cantidad == 0 {
                    return Err(AppError::CantidadInvalida);
                }
            }
            _ => {
                if cantidad <= 0 {
                    return Err(AppError::CantidadInvalida);
                }
            }
        }

        let mut tx = self.pool.begin().await?;

        // 1. El producto con su stock vigente.
        let producto = self
            .inventario_repo
            .find_producto(&mut *tx, producto_id)
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        // 2. El delta con signo según el tipo.
        let delta = match tipo {
            TipoMovimiento::Entrada | TipoMovimiento::Devolucion => cantidad,
            TipoMovimiento::Salida => -cantidad,
            TipoMovimiento::Ajuste => cantidad,
        };

        // 3. Una salida solo puede llevarse stock disponible: lo reservado
        // no cuenta. Y ningún movimiento deja el stock negativo.
        if tipo == TipoMovimiento::Salida {
            let disponible = producto.stock_actual - producto.stock_reservado;
            if cantidad > disponible {
                return Err(AppError::StockInsuficiente);
            }
        }
        if producto.stock_actual + delta < 0 {
            return Err(AppError::StockInsuficiente);
        }

        // 4. El movimiento y su efecto sobre el stock, juntos o ninguno.
        let movimiento = self
            .inventario_repo
            .insert_movimiento(
                &mut *tx,
                producto_id,
                tipo,
                delta,
                precio_unitario,
                motivo,
                actor.id,
            )
            .await?;

        self.inventario_repo
            .ajustar_stock(&mut *tx, producto_id, delta)
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        tx.commit().await?;

        tracing::info!(
            "📦 Movimiento {} sobre el producto {} (delta {})",
            movimiento.id,
            producto_id,
            delta
        );
        Ok(movimiento)
    }

    // ---
    // Reservas
    // ---

    pub async fn list_reservas(&self) -> Result<Vec<ReservaConProducto>, AppError> {
        self.inventario_repo.list_reservas().await
    }

    // Reservar aparta stock sin moverlo: sube stock_reservado y con eso
    // baja el disponible (stock_actual - stock_reservado).
    pub async fn create_reserva(
        &self,
        producto_id: i64,
        cantidad: i64,
        cliente_nombre: &str,
        cliente_telefono: Option<&str>,
        fecha_expiracion: Option<DateTime<Utc>>,
        actor: &Usuario,
    ) -> Result<Reserva, AppError> {
        if cantidad <= 0 {
            return Err(AppError::CantidadInvalida);
        }

        let mut tx = self.pool.begin().await?;

        let producto = self
            .inventario_repo
            .find_producto(&mut *tx, producto_id)
            .await?
            .ok_or(AppError::ProductoNotFound)?;

        let disponible = producto.stock_actual - producto.stock_reservado;
        if cantidad > disponible {
            return Err(AppError::StockInsuficiente);
        }

        let reserva = self
            .inventario_repo
            .create_reserva(
                &mut *tx,
                producto_id,
                cantidad,
                cliente_nombre,
                cliente_telefono,
                fecha_expiracion,
                actor.id,
            )
            .await?;

        self.inventario_repo
            .ajustar_stock_reservado(&mut *tx, producto_id, cantidad)
            .await?;

        tx.commit().await?;
        Ok(reserva)
    }

    // Transición de estado. Completar la reserva saca la mercadería como un
    // movimiento de salida; cancelarla o expirarla solo libera lo apartado.
    // Los estados terminales no admiten más transiciones.
    pub async fn update_reserva_estado(
        &self,
        id: i64,
        nuevo_estado: EstadoReserva,
        actor: &Usuario,
    ) -> Result<Reserva, AppError> {
        let mut tx = self.pool.begin().await?;

        let reserva = self
            .inventario_repo
            .find_reserva(&mut *tx, id)
            .await?
            .ok_or(AppError::ReservaNotFound)?;

        if reserva.estado.es_terminal() {
            return Err(AppError::ReservaCerrada);
        }

        match nuevo_estado {
            EstadoReserva::Completada => {
                self.inventario_repo
                    .insert_movimiento(
                        &mut *tx,
                        reserva.producto_id,
                        TipoMovimiento::Salida,
                        -reserva.cantidad,
                        None,
                        Some("Reserva completada"),
                        actor.id,
                    )
                    .await?;
                self.inventario_repo
                    .ajustar_stock(&mut *tx, reserva.producto_id, -reserva.cantidad)
                    .await?;
                self.inventario_repo
                    .ajustar_stock_reservado(&mut *tx, reserva.producto_id, -reserva.cantidad)
                    .await?;
            }
            EstadoReserva::Cancelada | EstadoReserva::Expirada => {
                self.inventario_repo
                    .ajustar_stock_reservado(&mut *tx, reserva.producto_id, -reserva.cantidad)
                    .await?;
            }
            // Activa y parcial son estados de seguimiento: no tocan stock.
            EstadoReserva::Activa | EstadoReserva::Parcial => {}
        }

        let actualizada = self
            .inventario_repo
            .update_reserva_estado(&mut *tx, id, nuevo_estado)
            .await?
            .ok_or(AppError::ReservaNotFound)?;

        tx.commit().await?;
        Ok(actualizada)
    }
}
