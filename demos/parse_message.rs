use multipush::{MultipartEvents, MultipartParser};

struct Printer;

impl MultipartEvents for Printer {
    fn on_part_begin(&mut self) {
        println!("-- part begin");
    }

    fn on_header_field(&mut self, data: &[u8]) {
        print!("header field: {}", String::from_utf8_lossy(data));
    }

    fn on_header_value(&mut self, data: &[u8]) {
        println!(" = {}", String::from_utf8_lossy(data));
    }

    fn on_part_data(&mut self, data: &[u8]) {
        println!("data fragment: {:?}", String::from_utf8_lossy(data));
    }

    fn on_part_end(&mut self) {
        println!("-- part end");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let content_type = "multipart/form-data; boundary=X-BOUNDARY";
    let body: &[u8] = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_text_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--";

    let boundary = multipush::parse_boundary(content_type)?;
    let mut parser = MultipartParser::with_boundary(&boundary, Printer)?;

    // Bytes can arrive in chunks of any size; feed one byte at a time to
    // show that fragmentation does not change what is reported.
    for chunk in body.chunks(1) {
        parser.write_all(chunk)?;
    }
    parser.end()?;

    Ok(())
}
